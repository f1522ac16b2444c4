use log::{error, warn};

/// Collects every warning and error raised while converting one input
/// file, mirroring each message through the `log` facade as it is
/// recorded. The collected messages become the errors artifact;
/// progress notes are logged directly and never recorded here.
#[derive(Debug, Default)]
pub struct AuditLog {
    messages: Vec<String>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: String) {
        warn!("{message}");
        self.messages.push(message);
    }

    pub fn error(&mut self, message: String) {
        error!("{message}");
        self.messages.push(message);
    }

    /// Messages in the order they were recorded.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_keep_recording_order() {
        let mut audit = AuditLog::new();
        assert!(audit.is_empty());

        audit.warn("b warning".to_string());
        audit.error("a error".to_string());

        assert_eq!(audit.messages(), ["b warning", "a error"]);
        assert_eq!(audit.into_messages().len(), 2);
    }
}
