//! Category walker: pre-order traversal of the category menu
//!
//! Each menu item is in one of three states (see `NodeKind`). Non-leaf
//! items append a row per child and descend into it; leaf items hand their
//! link to the product resolver; empty leaves are skipped. Siblings are
//! visited in document order, so the appended rows form a pre-order
//! listing of the menu that is identical between runs on the same site.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::resolver::ProductResolver;
use crate::crawler::selectors::{MenuNode, Selectors};
use crate::state::{CategoryNode, NodeKind, ResultList, TOP_PARENT};
use std::future::Future;
use std::pin::Pin;

/// Walks category menus, emitting category and product rows
pub struct CategoryWalker<'a> {
    resolver: ProductResolver<'a>,
}

impl<'a> CategoryWalker<'a> {
    pub fn new(fetcher: &'a Fetcher, selectors: &'a Selectors) -> Self {
        Self {
            resolver: ProductResolver::new(fetcher, selectors),
        }
    }

    /// Walks one top-level category, starting with its own row
    pub async fn walk_top(&self, node: &MenuNode, out: &mut ResultList) {
        out.push(CategoryNode::category(TOP_PARENT, &node.name));
        self.walk(node, &node.name, out).await;
    }

    /// Walks the subtree under `node`, whose rows are parented to `name`
    pub fn walk<'b>(
        &'b self,
        node: &'b MenuNode,
        name: &'b str,
        out: &'b mut ResultList,
    ) -> Pin<Box<dyn Future<Output = ()> + 'b>> {
        Box::pin(async move {
            match node.kind() {
                NodeKind::NonLeaf => {
                    for child in &node.children {
                        out.push(CategoryNode::category(name, &child.name));
                        self.walk(child, &child.name, out).await;
                    }
                }
                NodeKind::LeafWithProducts => {
                    if let Some(link) = &node.link {
                        self.resolver.resolve(link, name, out).await;
                    }
                }
                NodeKind::LeafEmpty => {
                    tracing::debug!("Category {:?} has no sub-categories and no link", name);
                }
            }
        })
    }
}
