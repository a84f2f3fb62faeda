use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::{Category, Id};

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTreeNode {
    pub id: Id,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Id>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryTreeNode>,
}

/// Builds the category forest from the flat category set in two passes:
/// one to group rows by parent id, one to assemble nodes from the roots down.
/// A category whose parent id is unknown is treated as a root. Root order
/// follows the input order.
pub fn build_category_tree(categories: Vec<Category>) -> Vec<CategoryTreeNode> {
    let known: HashSet<Id> = categories.iter().map(|c| c.id).collect();

    let mut children_of: HashMap<Id, Vec<Category>> = HashMap::new();
    let mut roots = Vec::new();
    for category in categories {
        match category.parent_id {
            Some(parent) if known.contains(&parent) => {
                children_of.entry(parent).or_default().push(category)
            }
            _ => roots.push(category),
        }
    }

    roots
        .into_iter()
        .map(|root| assemble(root, &mut children_of))
        .collect()
}

fn assemble(category: Category, children_of: &mut HashMap<Id, Vec<Category>>) -> CategoryTreeNode {
    // `remove` consumes each adjacency entry once, so a malformed cycle in the
    // stored data cannot recurse forever.
    let children = children_of
        .remove(&category.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| assemble(child, children_of))
        .collect();

    CategoryTreeNode {
        id: category.id,
        name: category.name,
        description: category.description,
        parent_id: category.parent_id,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(id: Id, parent_id: Option<Id>) -> Category {
        Category {
            id,
            name: format!("cat-{id}"),
            description: None,
            parent_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn builds_single_rooted_tree() {
        let tree = build_category_tree(vec![
            category(1, None),
            category(2, Some(1)),
            category(3, Some(1)),
            category(4, Some(2)),
        ]);

        assert_eq!(tree.len(), 1);
        let root = &tree[0];
        assert_eq!(root.id, 1);
        let child_ids: Vec<Id> = root.children.iter().map(|c| c.id).collect();
        assert_eq!(child_ids, vec![2, 3]);
        assert_eq!(root.children[0].children.len(), 1);
        assert_eq!(root.children[0].children[0].id, 4);
        assert!(root.children[1].children.is_empty());
    }

    #[test]
    fn multiple_roots_keep_input_order() {
        let tree = build_category_tree(vec![
            category(5, None),
            category(2, None),
            category(9, Some(2)),
        ]);
        let root_ids: Vec<Id> = tree.iter().map(|n| n.id).collect();
        assert_eq!(root_ids, vec![5, 2]);
    }

    #[test]
    fn unknown_parent_is_promoted_to_root() {
        let tree = build_category_tree(vec![category(1, Some(99)), category(2, Some(1))]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, 1);
        assert_eq!(tree[0].children[0].id, 2);
    }

    #[test]
    fn cyclic_rows_do_not_recurse_forever() {
        // Both rows have known parents, so neither is a root and the forest
        // comes out empty instead of looping.
        let tree = build_category_tree(vec![category(1, Some(2)), category(2, Some(1))]);
        assert!(tree.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_forest() {
        assert!(build_category_tree(Vec::new()).is_empty());
    }
}
