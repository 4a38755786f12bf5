// Outcome → chat message text.
//
// Words are shown via `kana::render_surface`, i.e. the katakana form of
// the reading. That is a plausible written form, not a dictionary lookup.

use shiritori_lang::kana;

use crate::room::{Outcome, Rules};

/// Render the reply for one outcome.
pub fn render(outcome: &Outcome, rules: &Rules) -> String {
    match outcome {
        Outcome::StartAck { bootstrap, next } => format!(
            "しりとりを始めます！最初の言葉は「{}」。「{next}」から始まる言葉をどうぞ。",
            kana::render_surface(bootstrap)
        ),
        Outcome::WaitingForStart => format!(
            "ゲームは始まっていません。「{}」と送ると始められます。",
            rules.start_trigger()
        ),
        Outcome::RejectedUnrecognized => {
            "言葉を読み取れませんでした。二文字以上の名詞・動詞・形容詞で答えてください。".into()
        }
        Outcome::RejectedReused { reading } => format!(
            "「{}」はもう使われています。別の言葉をどうぞ。",
            kana::render_surface(reading)
        ),
        Outcome::RejectedTerminalSound { reading } => format!(
            "「{}」は「{}」で終わるので使えません。別の言葉をどうぞ。",
            kana::render_surface(reading),
            kana::TERMINAL_SOUND
        ),
        Outcome::RejectedLeadMismatch { reading, required } => format!(
            "「{}」は「{required}」から始まっていません。「{required}」から始まる言葉をどうぞ。",
            kana::render_surface(reading)
        ),
        Outcome::HumanLoses { reading } => format!(
            "「{}」は「{}」で終わりました。あなたの負けです！「{}」でもう一度遊べます。",
            kana::render_surface(reading),
            kana::TERMINAL_SOUND,
            rules.start_trigger()
        ),
        Outcome::EngineLoses { reading, required } => format!(
            "「{}」…「{required}」から始まる言葉が思いつきません。あなたの勝ちです！",
            kana::render_surface(reading)
        ),
        Outcome::TurnAccepted {
            reading,
            reply,
            next,
        } => format!(
            "「{}」ですね。では「{}」。次は「{next}」から始まる言葉です。",
            kana::render_surface(reading),
            kana::render_surface(reply)
        ),
    }
}
