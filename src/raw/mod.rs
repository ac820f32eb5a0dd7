mod arena;
mod btree_node;
mod handle;
mod raw_rb_tree;
mod raw_tree234;
mod rb_node;

pub(crate) use btree_node::BTreeNode;
pub(crate) use handle::Handle;
pub(crate) use raw_rb_tree::RawRbTree;
pub(crate) use raw_tree234::RawTree234;
pub(crate) use rb_node::Side;
