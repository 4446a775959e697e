//! Required-field checks shared by the services

/// Collects missing required fields while taking their trimmed values
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a required text field; absent or blank values are recorded as missing
    pub fn take(&mut self, name: &'static str, value: Option<String>) -> String {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    /// `Err` with a message naming every missing field
    pub fn finish(self) -> Result<(), String> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(format!(
                "All fields are required (missing: {})",
                self.missing.join(", ")
            ))
        }
    }
}
