pub mod controller;
pub mod debounce;
pub mod index;
pub mod sink;
