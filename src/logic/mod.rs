pub mod text;
pub mod tree;

pub use text::capitalize_first_letter;
pub use tree::{build_category_tree, CategoryTreeNode};
