use crate::model::{Sourced, UserCredential, UserProfile};

/// Fixed in-memory login list. Not mutated by any endpoint.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<UserCredential>,
}

impl UserDirectory {
    pub fn new(users: Vec<UserCredential>) -> Self {
        Self { users }
    }

    /// The demo accounts the gateway firmware is tested against
    pub fn seeded() -> Self {
        Self::new(vec![
            UserCredential {
                id: 1,
                email: "igor@inatel.com".to_string(),
                password: "123456".to_string(),
                name: "Igor".to_string(),
            },
            UserCredential {
                id: 2,
                email: "yam@inatel.com".to_string(),
                password: "senha123".to_string(),
                name: "Yam".to_string(),
            },
        ])
    }

    /// Exact, case-sensitive match on both email and password.
    ///
    /// Returns `None` for an unknown email and for a wrong password alike.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<UserProfile> {
        self.users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .map(|u| UserProfile {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
            })
    }
}

/// No session is tracked, so every caller gets the same profile
pub fn placeholder_profile() -> Sourced<UserProfile> {
    Sourced::Placeholder(UserProfile {
        id: 1,
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
    })
}
