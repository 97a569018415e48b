//! Recording doubles for the host collaborators and a configurable test block

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::block::{Block, BlockContext};
use crate::core::hooks::{DeferredAction, HookQueue, HookSystem};
use crate::core::host::{AssetPipeline, BlockDescriptor, BlockHost, HostContext, ViewRenderer};
use crate::core::{AttributeOverrides, BlockAttributes, FieldGroup};

/// Block whose every capability is set by the test
#[derive(Clone)]
pub struct TestBlock {
    pub attributes: BlockAttributes,
    pub overrides: AttributeOverrides,
    pub fields: FieldGroup,
    pub data: Map<String, Value>,
    pub dir: PathBuf,
}

impl TestBlock {
    pub fn named(name: &str) -> Self {
        Self {
            attributes: BlockAttributes::named(name),
            overrides: AttributeOverrides::new(),
            fields: FieldGroup::new(),
            data: Map::new(),
            dir: PathBuf::from("/nonexistent/blocks"),
        }
    }

    pub fn overrides(mut self, overrides: AttributeOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn fields(mut self, fields: Value) -> Self {
        self.fields = FieldGroup::from_value(fields).expect("field group must be an object");
        self
    }

    pub fn data(mut self, key: &str, value: Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.attributes.enabled = false;
        self
    }

    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.dir = dir.to_path_buf();
        self
    }
}

impl Block for TestBlock {
    fn attributes(&self) -> BlockAttributes {
        self.attributes.clone()
    }

    fn register(&self) -> AttributeOverrides {
        self.overrides.clone()
    }

    fn fields(&self, _context: &BlockContext<'_>) -> FieldGroup {
        self.fields.clone()
    }

    fn with(&self, _context: &BlockContext<'_>) -> Map<String, Value> {
        self.data.clone()
    }

    fn path(&self) -> PathBuf {
        self.dir.clone()
    }
}

/// Host extension API that records every call
#[derive(Default)]
pub struct RecordingHost {
    pub descriptors: Mutex<Vec<BlockDescriptor>>,
    pub field_groups: Mutex<Vec<FieldGroup>>,
    pub reject: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn registered_slugs(&self) -> Vec<String> {
        self.descriptors
            .lock()
            .iter()
            .map(|descriptor| descriptor.slug.clone())
            .collect()
    }
}

impl BlockHost for RecordingHost {
    fn register_block_type(&self, descriptor: BlockDescriptor) -> anyhow::Result<()> {
        if self.reject {
            anyhow::bail!("block API rejected {}", descriptor.slug);
        }
        self.descriptors.lock().push(descriptor);
        Ok(())
    }

    fn add_local_field_group(&self, fields: FieldGroup) -> anyhow::Result<()> {
        self.field_groups.lock().push(fields);
        Ok(())
    }
}

/// Hook system that records scheduling order and forwards to a real queue
#[derive(Default)]
pub struct RecordingHooks {
    pub calls: Mutex<Vec<(String, i32, String)>>,
    pub queue: HookQueue,
}

impl RecordingHooks {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn labels(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(_, _, label)| label.clone()).collect()
    }
}

impl HookSystem for RecordingHooks {
    fn add_action(&self, phase: &str, priority: i32, label: String, action: DeferredAction) {
        self.calls
            .lock()
            .push((phase.to_string(), priority, label.clone()));
        self.queue.add_action(phase, priority, label, action);
    }
}

pub fn host_with(hooks: &Arc<RecordingHooks>, extension_api: bool) -> HostContext {
    HostContext::new(Arc::clone(hooks) as Arc<dyn HookSystem>, extension_api)
}

/// Asset enqueued with the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enqueued {
    Style { handle: String, src: String },
    Script { handle: String, src: String, in_footer: bool },
}

#[derive(Default)]
pub struct RecordingPipeline {
    pub enqueued: Mutex<Vec<Enqueued>>,
}

impl RecordingPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styles(&self) -> usize {
        self.enqueued
            .lock()
            .iter()
            .filter(|asset| matches!(asset, Enqueued::Style { .. }))
            .count()
    }

    pub fn scripts(&self) -> usize {
        self.enqueued
            .lock()
            .iter()
            .filter(|asset| matches!(asset, Enqueued::Script { .. }))
            .count()
    }
}

impl AssetPipeline for RecordingPipeline {
    fn enqueue_style(&self, handle: &str, src: &str) {
        self.enqueued.lock().push(Enqueued::Style {
            handle: handle.to_string(),
            src: src.to_string(),
        });
    }

    fn enqueue_script(&self, handle: &str, src: &str, in_footer: bool) {
        self.enqueued.lock().push(Enqueued::Script {
            handle: handle.to_string(),
            src: src.to_string(),
            in_footer,
        });
    }
}

/// Renders `<template file name>|<data as json>`
pub struct StubRenderer;

impl ViewRenderer for StubRenderer {
    fn render(&self, template: &Path, data: &Map<String, Value>) -> anyhow::Result<String> {
        let name = template
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(format!("{}|{}", name, Value::Object(data.clone())))
    }
}

/// Template engine that always fails
pub struct BrokenRenderer;

impl ViewRenderer for BrokenRenderer {
    fn render(&self, _template: &Path, _data: &Map<String, Value>) -> anyhow::Result<String> {
        anyhow::bail!("syntax error in template")
    }
}
