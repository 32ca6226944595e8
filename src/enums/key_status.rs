#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStatus {
    Valid,
    Invalid(String),
    Unreachable(String),
}

impl KeyStatus {
    pub fn message(&self) -> String {
        match self {
            Self::Valid => "✅ API Key is valid!".to_string(),
            Self::Invalid(reason) => format!("❌ Invalid API Key. Please check the key and try again. ({reason})"),
            Self::Unreachable(reason) => format!("🌐 Could not connect. Please check your internet connection. ({reason})"),
        }
    }
}
