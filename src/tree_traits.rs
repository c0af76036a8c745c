//! Terminal rendering of navigation trees.

use generational_arena::Index;
use termtree::Tree;

use crate::domain::{NavTree, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn node_text(node: &TreeNode) -> String {
    if node.label.is_empty() && node.id.is_none() {
        "(root)".to_string()
    } else {
        node.to_string()
    }
}

impl TreeNodeConvert for NavTree {
    fn to_tree_string(&self) -> Tree<String> {
        let Some((root_idx, root)) = self
            .root()
            .and_then(|idx| self.get_node(idx).map(|n| (idx, n)))
        else {
            return Tree::new("Empty tree".to_string());
        };

        fn build_tree(nav: &NavTree, node_idx: Index, parent_tree: &mut Tree<String>) {
            for (child_idx, child) in nav.children(node_idx) {
                let mut child_tree = Tree::new(node_text(child));
                build_tree(nav, child_idx, &mut child_tree);
                parent_tree.push(child_tree);
            }
        }

        let mut tree = Tree::new(node_text(root));
        build_tree(self, root_idx, &mut tree);
        tree
    }
}
