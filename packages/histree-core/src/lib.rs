/*
 * Histree Core - Source Model Extraction & Cross-Revision Entity Matching
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (QualifiedPath, Span, ModifierSet, Diagnostic)
 * - features/    : Vertical slices (lexing → syntax → model → diffing → history)
 * - pipeline/    : Revision sequence orchestration (rayon fan-out per file)
 *
 * Determinism:
 * - Edit scripts and entity identifiers are pure functions of the input
 *   revision sequence and configuration; parallel extraction never leaks
 *   scheduling order into the output.
 */

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules (extraction and matching stages)
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Public engine operations
pub mod api;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use api::{aggregate, diff, parse_file, parse_file_with, process_project};
pub use config::{DuplicatePolicy, EngineConfig, MovePolicy};
pub use errors::{
    ConfigError, ExtractError, LexError, LexErrorKind, ModelError, Result, SyntaxError,
};
pub use features::diffing::{Change, ChangeKind, RevisionEditScript};
pub use features::history::{EntityHistory, EntityId, HistoryEntry, HistoryStore, RevisionId};
pub use features::model::{
    Entity, EntityKind, FileModel, Signature, TypeKind, ANONYMOUS_TYPE_NAME,
};
pub use pipeline::{ProjectHistory, Revision};
pub use shared::{Diagnostic, Location, ModifierSet, QualifiedPath, Severity, Span};
