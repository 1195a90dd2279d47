// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

use crate::types::NodeId;

/// Errors from structural scene mutations.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum SceneError {
    /// The identifier refers to a removed node, or was never issued.
    #[error("node {0} is not alive")]
    StaleNode(NodeId),
    /// Attaching `node` under `parent` would make it its own ancestor.
    #[error("cannot attach {node} under {parent}: {parent} is inside its subtree")]
    WouldCycle {
        /// The node being moved.
        node: NodeId,
        /// The requested new parent.
        parent: NodeId,
    },
}
