//! Help metadata produced per command and rendered by the text formatter.

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HelpDetails {
    pub description: String,
    pub usage: String,
    pub comments: String,
    /// (display form, description) per parameter, declaration order.
    pub parameters: Vec<(String, String)>,
    /// (syntax, explanation) pairs.
    pub examples: Vec<(String, String)>,
}

impl HelpDetails {
    pub fn add_parameter(&mut self, display: impl Into<String>, description: impl Into<String>) {
        self.parameters.push((display.into(), description.into()));
    }

    pub fn add_example(&mut self, syntax: impl Into<String>, explanation: impl Into<String>) {
        self.examples.push((syntax.into(), explanation.into()));
    }
}
