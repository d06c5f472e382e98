use std::sync::Arc;

use crate::{
    db::{ContentRepository, ListRepository, UserRepository},
    services::MyListService,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub my_list: Arc<MyListService>,
}

impl AppState {
    pub fn new(my_list: MyListService) -> Self {
        Self {
            my_list: Arc::new(my_list),
        }
    }

    /// Wires the service against a single backend that serves users, content
    /// and list entries
    pub fn from_store<S>(store: S) -> Self
    where
        S: UserRepository + ContentRepository + ListRepository + 'static,
    {
        let store = Arc::new(store);
        Self::new(MyListService::new(store.clone(), store.clone(), store))
    }
}
