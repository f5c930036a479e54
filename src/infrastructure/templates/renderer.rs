use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::entities::submission::SubmissionRequest;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(name|email|project|message)").expect("placeholder pattern is valid")
});

/// Values substituted into a template. `message` is stored with newlines
/// already turned into `<br>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateValues {
    pub name: String,
    pub email: String,
    pub project: String,
    pub message: String,
}

impl TemplateValues {
    pub fn new(name: &str, email: &str, project: &str, message: &str) -> Self {
        TemplateValues {
            name: name.to_string(),
            email: email.to_string(),
            project: project.to_string(),
            message: message.replace('\n', "<br>"),
        }
    }

    fn get(&self, key: &str) -> &str {
        match key {
            "name" => &self.name,
            "email" => &self.email,
            "project" => &self.project,
            "message" => &self.message,
            _ => "",
        }
    }
}

impl From<&SubmissionRequest> for TemplateValues {
    fn from(req: &SubmissionRequest) -> Self {
        TemplateValues::new(&req.name, &req.email, &req.project, &req.message)
    }
}

/// Replaces every `$name`, `$email`, `$project` and `$message` in `source`.
///
/// Single pass, so placeholder text inside a submitted value is left as is.
/// Values are inserted raw; HTML in user input is not escaped.
pub fn render(source: &str, values: &TemplateValues) -> String {
    PLACEHOLDER
        .replace_all(source, |caps: &Captures| values.get(&caps[1]).to_string())
        .into_owned()
}
