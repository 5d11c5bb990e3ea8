//! Signal graph builder.
//!
//! Creates one runtime node per registry stage and wires them in
//! [`StageId::SIGNAL_ORDER`], terminating at the master stage, which is the
//! only node connected to the destination. The topology is fixed once built;
//! only parameter values change afterwards.

use stemfx_core::{AudioRuntime, NodeHandle, RuntimeError, StageId};
use stemfx_registry::NodeRegistry;

/// Runtime nodes of the fixed serial chain, indexed by slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalGraph {
    nodes: Vec<NodeHandle>,
}

impl SignalGraph {
    /// Creates a node for every stage with its current registry values and
    /// connects them in signal order, master to destination.
    ///
    /// # Errors
    ///
    /// Returns the runtime's error if a node cannot be created or connected.
    pub fn build<R: AudioRuntime>(
        runtime: &mut R,
        registry: &NodeRegistry,
    ) -> Result<Self, RuntimeError> {
        let mut nodes = Vec::with_capacity(StageId::COUNT);
        for stage in registry.iter() {
            let params: Vec<(&'static str, f64)> =
                stage.params().map(|(desc, value)| (desc.name, value)).collect();
            let node = runtime.create_stage(stage.kind(), &params)?;
            tracing::debug!(stage = %stage.id(), %node, "created stage node");
            nodes.push(node);
        }

        for pair in nodes.windows(2) {
            runtime.connect(pair[0], pair[1])?;
        }
        let graph = Self { nodes };
        runtime.connect_to_destination(graph.master())?;

        tracing::debug!(stages = graph.nodes.len(), "signal graph wired");
        Ok(graph)
    }

    /// Runtime node of a slot.
    pub fn node(&self, id: StageId) -> NodeHandle {
        self.nodes[id.signal_index()]
    }

    /// Entry point fed by the transport or the stretch node.
    pub fn input(&self) -> NodeHandle {
        self.node(StageId::Input)
    }

    /// Terminal stage, connected to the destination.
    pub fn master(&self) -> NodeHandle {
        self.node(StageId::Master)
    }

    /// Iterates `(slot, node)` pairs in signal order.
    pub fn iter(&self) -> impl Iterator<Item = (StageId, NodeHandle)> + '_ {
        StageId::SIGNAL_ORDER
            .into_iter()
            .zip(self.nodes.iter().copied())
    }
}
