/// The signed-in user. Supplied once at startup and only ever read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
}

const NO_NAME: &str = "N/A";

impl Session {
    pub fn new(user_id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email,
        }
    }

    /// Local part of the email address, or "N/A".
    pub fn display_name(&self) -> String {
        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|name| !name.is_empty())
            .unwrap_or(NO_NAME)
            .to_string()
    }

    pub fn greeting(&self) -> String {
        format!("Hi, {}", self.display_name().to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_from_email() {
        let s = Session::new("u1", Some("jane.doe@example.com".into()));
        assert_eq!(s.display_name(), "jane.doe");
        assert_eq!(s.greeting(), "Hi, JANE.DOE");
    }

    #[test]
    fn missing_email_shows_placeholder() {
        assert_eq!(Session::new("u1", None).display_name(), "N/A");
        assert_eq!(Session::new("u1", Some(String::new())).display_name(), "N/A");
    }
}
