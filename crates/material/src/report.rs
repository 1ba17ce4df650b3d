//! Conversion diagnostics.
//!
//! The engine never logs directly. It emits [`ConversionEvent`]s through an
//! injected [`Reporter`]:
//! - [`TracingReporter`] - forwards events to `tracing`
//! - [`RecordingReporter`] - keeps events in memory, used by tests

use std::fmt;
use std::sync::RwLock;

use tracing::{info, warn};

use crate::keys::SlotKind;

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionEvent {
    /// Materials of one source are about to be parsed.
    SourceParsing { source: String, materials: usize },
    /// A material name was seen again in a later source and skipped.
    DuplicateMaterial {
        material: String,
        kept_from: String,
        skipped_from: String,
    },
    /// All sources parsed.
    MaterialsParsed { count: usize },
    /// Unique output textures of one slot kind.
    OutputTexturesNamed { slot: SlotKind, count: usize },
    /// A `$DEFAULT_*` texture has no compression job.
    DefaultTextureSkipped { name: String },
    /// Output documents assembled.
    DocumentsBuilt {
        materials: usize,
        textures: usize,
        models: usize,
    },
}

impl ConversionEvent {
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ConversionEvent::DuplicateMaterial { .. } | ConversionEvent::DefaultTextureSkipped { .. }
        )
    }
}

impl fmt::Display for ConversionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionEvent::SourceParsing { source, materials } => {
                write!(f, "parsing {materials} materials from {source}")
            }
            ConversionEvent::DuplicateMaterial {
                material,
                kept_from,
                skipped_from,
            } => write!(
                f,
                "{material} already specified in {kept_from}, skipping version from {skipped_from}"
            ),
            ConversionEvent::MaterialsParsed { count } => write!(f, "parsed {count} unique materials"),
            ConversionEvent::OutputTexturesNamed { slot, count } => {
                write!(f, "{count} unique {slot} textures")
            }
            ConversionEvent::DefaultTextureSkipped { name } => {
                write!(f, "skipping default texture {name}")
            }
            ConversionEvent::DocumentsBuilt {
                materials,
                textures,
                models,
            } => write!(
                f,
                "built {materials} material, {textures} texture and {models} model documents"
            ),
        }
    }
}

/// Sink for conversion events.
pub trait Reporter {
    fn report(&self, event: ConversionEvent);
}

/// Forwards events to `tracing`, warnings at WARN and the rest at INFO.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: ConversionEvent) {
        if event.is_warning() {
            warn!("{event}");
        } else {
            info!("{event}");
        }
    }
}

/// Stores every event it receives.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: RwLock<Vec<ConversionEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ConversionEvent> {
        self.events.read().expect("RecordingReporter lock poisoned").clone()
    }

    pub fn warnings(&self) -> Vec<ConversionEvent> {
        let events = self.events.read().expect("RecordingReporter lock poisoned");
        events.iter().filter(|e| e.is_warning()).cloned().collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: ConversionEvent) {
        let mut events = self.events.write().expect("RecordingReporter lock poisoned");
        events.push(event);
    }
}
