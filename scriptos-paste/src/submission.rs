/// A script submitted through `/script`, alive only for the upload call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Submission {
    pub name: String,
    pub body: String,
    pub key: String,
}

impl Submission {
    pub fn new(name: impl Into<String>, body: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            key: key.into(),
        }
    }

    /// Render the flat text document that gets uploaded.
    ///
    /// Name, body and key are separated by blank lines; the body is copied verbatim.
    pub fn document(&self) -> String {
        format!(
            "Name: {}\n\nScript:\n{}\n\nKey:\n{}",
            self.name, self.body, self.key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_keeps_section_order() {
        let submission = Submission::new("Test", "print(1)", "abc123");

        assert_eq!(
            submission.document(),
            "Name: Test\n\nScript:\nprint(1)\n\nKey:\nabc123"
        );
    }

    #[test]
    fn document_passes_body_through_untouched() {
        let body = "local x = \"<@everyone>\"\n\n```lua\n& %20 \\n";
        let submission = Submission::new("Raw", body, "k");

        assert!(submission.document().contains(body));
    }
}
