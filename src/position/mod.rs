pub mod coordinator;
pub mod expansion;
pub mod model;
pub mod routes;
pub mod tree;


pub use coordinator::{PositionCoordinator, TreeSnapshot};
pub use tree::{build_tree, remove_subtree, TreeNode};
