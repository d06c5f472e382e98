pub mod my_list;

pub use my_list::{AddToList, MyListService, RemoveFromList};
