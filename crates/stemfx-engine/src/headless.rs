//! In-memory audio-node runtime.
//!
//! [`HeadlessRuntime`] implements [`AudioRuntime`] and [`NativeExtension`]
//! without producing sound. It records every node, parameter, connection, and
//! transport state change so the engine can run offline (session export from
//! the CLI) and tests can inspect the resulting topology.
//!
//! Sources and extension modules are only "available" once registered with
//! [`with_source`](HeadlessRuntime::with_source) and
//! [`with_module`](HeadlessRuntime::with_module). Failures can be injected
//! with [`fail_stage_creation`](HeadlessRuntime::fail_stage_creation),
//! [`fail_next_connects`](HeadlessRuntime::fail_next_connects), and
//! [`fail_next_param_writes`](HeadlessRuntime::fail_next_param_writes).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use stemfx_core::{
    AudioRuntime, ExtensionError, NativeExtension, NodeHandle, RuntimeError, StageKind,
};

/// What a recorded node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeLabel {
    /// A processing stage.
    Stage(StageKind),
    /// A transport source, with the locator it was loaded from.
    Source(String),
    /// An extension node, with its processor name.
    Extension(String),
}

#[derive(Debug, Clone)]
struct HeadlessNode {
    label: NodeLabel,
    params: BTreeMap<String, f64>,
    outputs: Vec<NodeHandle>,
    to_destination: bool,
    playing: bool,
}

impl HeadlessNode {
    fn new(label: NodeLabel, params: &[(&'static str, f64)]) -> Self {
        Self {
            label,
            params: params
                .iter()
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect(),
            outputs: Vec::new(),
            to_destination: false,
            playing: false,
        }
    }
}

/// Audio-node runtime that records operations instead of rendering audio.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRuntime {
    nodes: Vec<HeadlessNode>,
    sources: BTreeSet<String>,
    modules: BTreeMap<String, String>,
    loaded_processors: BTreeSet<String>,
    failing_kinds: BTreeSet<StageKind>,
    connects_before_failure: usize,
    failing_connects: usize,
    failing_param_writes: usize,
}

impl HeadlessRuntime {
    /// Create an empty runtime with no sources or modules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes a source locator loadable.
    pub fn with_source(mut self, locator: impl Into<String>) -> Self {
        self.sources.insert(locator.into());
        self
    }

    /// Makes an extension module loadable at `path`, registering `processor`.
    pub fn with_module(mut self, path: impl Into<String>, processor: impl Into<String>) -> Self {
        self.modules.insert(path.into(), processor.into());
        self
    }

    /// Makes creating a stage of this kind fail.
    pub fn fail_stage_creation(&mut self, kind: StageKind) {
        self.failing_kinds.insert(kind);
    }

    /// Makes the next `count` connect calls fail.
    pub fn fail_next_connects(&mut self, count: usize) {
        self.fail_connects_after(0, count);
    }

    /// Lets `skip` connect calls succeed, then makes the following `count` fail.
    pub fn fail_connects_after(&mut self, skip: usize, count: usize) {
        self.connects_before_failure = skip;
        self.failing_connects = count;
    }

    /// Makes the next `count` parameter writes fail.
    pub fn fail_next_param_writes(&mut self, count: usize) {
        self.failing_param_writes = count;
    }

    /// Number of nodes created so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Label of a node.
    pub fn label(&self, node: NodeHandle) -> Option<&NodeLabel> {
        self.node(node).ok().map(|n| &n.label)
    }

    /// Direct outgoing connections of a node.
    pub fn outputs(&self, node: NodeHandle) -> &[NodeHandle] {
        self.node(node).map_or(&[], |n| n.outputs.as_slice())
    }

    /// Returns `true` if `from` is directly connected to `to`.
    pub fn is_connected(&self, from: NodeHandle, to: NodeHandle) -> bool {
        self.outputs(from).contains(&to)
    }

    /// Returns `true` if a path of connections leads from `from` to `to`.
    pub fn reaches(&self, from: NodeHandle, to: NodeHandle) -> bool {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            if seen.insert(current) {
                queue.extend(self.outputs(current).iter().copied());
            }
        }
        false
    }

    /// Returns `true` if a path leads from `from` to the hardware destination.
    pub fn reaches_destination(&self, from: NodeHandle) -> bool {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.to_destination)
            .any(|(i, _)| self.reaches(from, handle(i)))
    }

    /// Returns `true` if a source is playing.
    pub fn is_playing(&self, source: NodeHandle) -> bool {
        self.node(source).is_ok_and(|n| n.playing)
    }

    /// Handles of every extension node created so far.
    pub fn extension_nodes(&self) -> Vec<NodeHandle> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| matches!(n.label, NodeLabel::Extension(_)))
            .map(|(i, _)| handle(i))
            .collect()
    }

    fn node(&self, node: NodeHandle) -> Result<&HeadlessNode, RuntimeError> {
        self.nodes
            .get(node.index() as usize)
            .ok_or(RuntimeError::UnknownNode(node))
    }

    fn node_mut(&mut self, node: NodeHandle) -> Result<&mut HeadlessNode, RuntimeError> {
        self.nodes
            .get_mut(node.index() as usize)
            .ok_or(RuntimeError::UnknownNode(node))
    }

    fn push(&mut self, node: HeadlessNode) -> NodeHandle {
        self.nodes.push(node);
        handle(self.nodes.len() - 1)
    }
}

fn handle(index: usize) -> NodeHandle {
    NodeHandle(u32::try_from(index).unwrap_or(u32::MAX))
}

impl AudioRuntime for HeadlessRuntime {
    fn create_stage(
        &mut self,
        kind: StageKind,
        params: &[(&'static str, f64)],
    ) -> Result<NodeHandle, RuntimeError> {
        if self.failing_kinds.contains(&kind) {
            return Err(RuntimeError::Backend(format!("cannot create {kind}")));
        }
        Ok(self.push(HeadlessNode::new(NodeLabel::Stage(kind), params)))
    }

    fn connect(&mut self, from: NodeHandle, to: NodeHandle) -> Result<(), RuntimeError> {
        self.node(to)?;
        if self.connects_before_failure > 0 {
            self.connects_before_failure -= 1;
        } else if self.failing_connects > 0 {
            self.failing_connects -= 1;
            return Err(RuntimeError::Backend(format!("cannot connect {from} to {to}")));
        }
        let node = self.node_mut(from)?;
        if !node.outputs.contains(&to) {
            node.outputs.push(to);
        }
        Ok(())
    }

    fn disconnect(&mut self, node: NodeHandle) -> Result<(), RuntimeError> {
        let node = self.node_mut(node)?;
        node.outputs.clear();
        node.to_destination = false;
        Ok(())
    }

    fn connect_to_destination(&mut self, node: NodeHandle) -> Result<(), RuntimeError> {
        self.node_mut(node)?.to_destination = true;
        Ok(())
    }

    fn param(&self, node: NodeHandle, name: &str) -> Option<f64> {
        self.node(node).ok()?.params.get(name).copied()
    }

    fn set_param(&mut self, node: NodeHandle, name: &str, value: f64) -> Result<(), RuntimeError> {
        if self.failing_param_writes > 0 {
            self.failing_param_writes -= 1;
            return Err(RuntimeError::Backend(format!("cannot set {name} on {node}")));
        }
        let param = self
            .node_mut(node)?
            .params
            .get_mut(name)
            .ok_or_else(|| RuntimeError::UnknownParam {
                node,
                name: name.to_string(),
            })?;
        *param = value;
        Ok(())
    }

    async fn load_source(&mut self, locator: &str) -> Result<NodeHandle, RuntimeError> {
        if !self.sources.contains(locator) {
            return Err(RuntimeError::SourceUnavailable(locator.to_string()));
        }
        Ok(self.push(HeadlessNode::new(
            NodeLabel::Source(locator.to_string()),
            &[],
        )))
    }

    fn start(&mut self, source: NodeHandle) -> Result<(), RuntimeError> {
        self.node_mut(source)?.playing = true;
        Ok(())
    }

    fn stop(&mut self, source: NodeHandle) -> Result<(), RuntimeError> {
        self.node_mut(source)?.playing = false;
        Ok(())
    }
}

impl NativeExtension for HeadlessRuntime {
    async fn load_module(&mut self, path: &str) -> Result<(), ExtensionError> {
        let processor = self
            .modules
            .get(path)
            .ok_or_else(|| ExtensionError::ModuleNotFound(path.to_string()))?;
        self.loaded_processors.insert(processor.clone());
        Ok(())
    }

    fn create_extension_node(
        &mut self,
        processor: &str,
        params: &[(&'static str, f64)],
    ) -> Result<NodeHandle, ExtensionError> {
        if !self.loaded_processors.contains(processor) {
            return Err(ExtensionError::ProcessorUnavailable(processor.to_string()));
        }
        Ok(self.push(HeadlessNode::new(
            NodeLabel::Extension(processor.to_string()),
            params,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_nodes_and_params() {
        let mut rt = HeadlessRuntime::new();
        let node = rt
            .create_stage(StageKind::Gain, &[("gain", 1.0)])
            .unwrap();
        assert_eq!(rt.label(node), Some(&NodeLabel::Stage(StageKind::Gain)));
        assert_eq!(rt.param(node, "gain"), Some(1.0));

        rt.set_param(node, "gain", 2.0).unwrap();
        assert_eq!(rt.param(node, "gain"), Some(2.0));
        assert!(rt.set_param(node, "wet", 0.5).is_err());
    }

    #[test]
    fn test_reaches_follows_paths() {
        let mut rt = HeadlessRuntime::new();
        let a = rt.create_stage(StageKind::Gain, &[]).unwrap();
        let b = rt.create_stage(StageKind::Reverb, &[]).unwrap();
        let c = rt.create_stage(StageKind::Gain, &[]).unwrap();
        rt.connect(a, b).unwrap();
        rt.connect(b, c).unwrap();
        rt.connect_to_destination(c).unwrap();

        assert!(rt.reaches(a, c));
        assert!(!rt.reaches(c, a));
        assert!(rt.reaches_destination(a));

        rt.disconnect(a).unwrap();
        assert!(!rt.reaches(a, c));
        assert!(!rt.reaches_destination(a));
    }

    #[test]
    fn test_connect_failure_injection() {
        let mut rt = HeadlessRuntime::new();
        let a = rt.create_stage(StageKind::Gain, &[]).unwrap();
        let b = rt.create_stage(StageKind::Gain, &[]).unwrap();
        rt.fail_next_connects(1);
        assert!(rt.connect(a, b).is_err());
        assert!(rt.connect(a, b).is_ok());
        assert!(rt.is_connected(a, b));

        rt.fail_connects_after(1, 1);
        assert!(rt.connect(b, a).is_ok());
        assert!(rt.connect(a, b).is_err());
        assert!(rt.connect(a, b).is_ok());
    }

    #[test]
    fn test_param_write_failure_injection() {
        let mut rt = HeadlessRuntime::new();
        let node = rt.create_stage(StageKind::Gain, &[("gain", 1.0)]).unwrap();
        rt.fail_next_param_writes(1);
        assert!(rt.set_param(node, "gain", 2.0).is_err());
        assert_eq!(rt.param(node, "gain"), Some(1.0));
        rt.set_param(node, "gain", 2.0).unwrap();
        assert_eq!(rt.param(node, "gain"), Some(2.0));
    }

    #[test]
    fn test_stage_creation_failure_injection() {
        let mut rt = HeadlessRuntime::new();
        rt.fail_stage_creation(StageKind::Reverb);
        assert!(rt.create_stage(StageKind::Reverb, &[]).is_err());
        assert!(rt.create_stage(StageKind::Chorus, &[]).is_ok());
    }

    #[tokio::test]
    async fn test_sources_must_be_registered() {
        let mut rt = HeadlessRuntime::new().with_source("stems/vocals.wav");
        let source = rt.load_source("stems/vocals.wav").await.unwrap();
        assert_eq!(
            rt.label(source),
            Some(&NodeLabel::Source("stems/vocals.wav".to_string()))
        );
        assert_eq!(
            rt.load_source("missing.wav").await,
            Err(RuntimeError::SourceUnavailable("missing.wav".to_string()))
        );

        rt.start(source).unwrap();
        assert!(rt.is_playing(source));
        rt.stop(source).unwrap();
        assert!(!rt.is_playing(source));
    }

    #[tokio::test]
    async fn test_extension_requires_loaded_module() {
        let mut rt = HeadlessRuntime::new().with_module("/stretch.js", "stretch");
        assert!(matches!(
            rt.create_extension_node("stretch", &[]),
            Err(ExtensionError::ProcessorUnavailable(_))
        ));
        assert!(matches!(
            rt.load_module("/other.js").await,
            Err(ExtensionError::ModuleNotFound(_))
        ));

        rt.load_module("/stretch.js").await.unwrap();
        let node = rt
            .create_extension_node("stretch", &[("tempo", 1.0)])
            .unwrap();
        assert_eq!(rt.param(node, "tempo"), Some(1.0));
        assert_eq!(rt.extension_nodes(), vec![node]);
    }
}
