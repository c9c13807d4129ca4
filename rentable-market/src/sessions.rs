use dashmap::DashMap;

use crate::{util::random_string, Cart, Category, UserData};

const TOKEN_LENGTH: usize = 32;

/// Login session data handed to the web layer
#[derive(Debug, Clone)]
pub struct SessionData {
    /// The session token, or key if you will
    pub token: String,
    /// The user that is logged in
    pub user: UserData,
}

/// Holds every live session, keyed by bearer token. Each session owns the
/// logged-in user, the cart, and the favorite-category selection. Nothing
/// here is persisted; sessions end with the process.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, SessionEntry>,
}

struct SessionEntry {
    user: UserData,
    cart: Cart,
    favorite_category: Option<Category>,
}

impl SessionRegistry {
    pub fn create(&self, user: UserData) -> SessionData {
        let token = random_string(TOKEN_LENGTH);

        self.sessions.insert(
            token.clone(),
            SessionEntry {
                user: user.clone(),
                cart: Cart::default(),
                favorite_category: None,
            },
        );

        SessionData { token, user }
    }

    pub fn get(&self, token: &str) -> Option<SessionData> {
        self.sessions.get(token).map(|entry| SessionData {
            token: token.to_string(),
            user: entry.user.clone(),
        })
    }

    pub fn remove(&self, token: &str) {
        self.sessions.remove(token);
    }

    /// Runs a closure over the session's cart. Mutations persist for the
    /// lifetime of the session. Returns None when the session is gone.
    pub fn with_cart<T>(&self, token: &str, f: impl FnOnce(&mut Cart) -> T) -> Option<T> {
        self.sessions
            .get_mut(token)
            .map(|mut entry| f(&mut entry.cart))
    }

    pub fn favorite_category(&self, token: &str) -> Option<Category> {
        self.sessions.get(token).and_then(|e| e.favorite_category)
    }

    pub fn set_favorite_category(&self, token: &str, category: Category) -> bool {
        match self.sessions.get_mut(token) {
            Some(mut entry) => {
                entry.favorite_category = Some(category);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str) -> UserData {
        UserData {
            id: 1,
            username: username.to_string(),
            password: "hunter2".to_string(),
            phone: "010-1234".to_string(),
        }
    }

    #[test]
    fn sessions_resolve_until_removed() {
        let registry = SessionRegistry::default();
        let session = registry.create(user("alice"));

        assert_eq!(registry.get(&session.token).unwrap().user.username, "alice");

        registry.remove(&session.token);
        assert!(registry.get(&session.token).is_none());
    }

    #[test]
    fn carts_persist_across_accesses() {
        let registry = SessionRegistry::default();
        let session = registry.create(user("alice"));

        registry.with_cart(&session.token, |cart| cart.add(1, 2));
        registry.with_cart(&session.token, |cart| cart.add(1, 3));

        let days = registry
            .with_cart(&session.token, |cart| cart.entries()[0].days)
            .unwrap();

        assert_eq!(days, 5);
    }

    #[test]
    fn favorite_category_is_per_session() {
        let registry = SessionRegistry::default();
        let alice = registry.create(user("alice"));
        let carol = registry.create(user("carol"));

        assert!(registry.set_favorite_category(&alice.token, Category::Sports));

        assert_eq!(
            registry.favorite_category(&alice.token),
            Some(Category::Sports)
        );
        assert_eq!(registry.favorite_category(&carol.token), None);
        assert!(!registry.set_favorite_category("bogus", Category::Sports));
    }
}
