use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "bot", alias = "assistant")]
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(rename = "who")]
    pub sender: Sender,
    pub text: String,
    /// Unix time in milliseconds
    #[serde(rename = "t")]
    pub timestamp_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_exported_logs() {
        let rec = MessageRecord { sender: Sender::Assistant, text: "hi".into(), timestamp_ms: 7 };
        assert_eq!(serde_json::to_string(&rec).unwrap(), r#"{"who":"bot","text":"hi","t":7}"#);
        let back: MessageRecord = serde_json::from_str(r#"{"who":"assistant","text":"x","t":1}"#).unwrap();
        assert_eq!(back.sender, Sender::Assistant);
    }
}
