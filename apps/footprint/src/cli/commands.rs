//! # CLI Command Implementations

use footprint::{FootprintConfig, JsonLoader, LoadedDocument};
use footprint_core::{
    AtMostOnce, Chain, FieldEnumerator, FootprintError, Features, Heap, ObjectExplorer,
    ObjectGraphMeasurer, ObjectId, ObjectVisitor, Traversal, Value, not_shared,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Output switches shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json_mode: bool,
    pub verbose: bool,
}

// =============================================================================
// INPUT VALIDATION
// =============================================================================

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), FootprintError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| FootprintError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(FootprintError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve `path` to an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, FootprintError> {
    let canonical = path.canonicalize().map_err(|e| {
        FootprintError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(FootprintError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate, read and load a JSON document.
fn load_document(config: &FootprintConfig, file: &Path) -> Result<LoadedDocument, FootprintError> {
    let path = validate_file_path(file)?;
    validate_file_size(&path, config.limits.max_input_bytes)?;

    let text = std::fs::read_to_string(&path)
        .map_err(|e| FootprintError::IoError(format!("Cannot read '{}': {}", path.display(), e)))?;
    let document = JsonLoader::new(&config.loader).load_str(&text)?;

    tracing::info!(
        file = %path.display(),
        heap_objects = document.heap.object_count(),
        "document loaded"
    );
    Ok(document)
}

// =============================================================================
// MEASURE COMMAND
// =============================================================================

/// Measure a JSON document.
pub fn cmd_measure(
    config: &FootprintConfig,
    output: Output,
    file: &Path,
    skip_types: Vec<String>,
) -> Result<(), FootprintError> {
    let document = load_document(config, file)?;
    let heap = &document.heap;

    let skipped: BTreeSet<String> = config
        .prune
        .skip_types
        .iter()
        .cloned()
        .chain(skip_types)
        .collect();
    if !skipped.is_empty() {
        tracing::info!(types = ?skipped, "pruning object types");
    }

    let accept = |value: &Value<ObjectId>| match value {
        Value::Object(handle) => heap
            .type_name(*handle)
            .is_none_or(|name| !skipped.contains(name.as_str())),
        Value::Primitive(_) | Value::Null => true,
    };
    let footprint = ObjectGraphMeasurer::new(heap).measure_with(document.root, Some(accept))?;

    if output.json_mode {
        let report = serde_json::json!({
            "file": file.to_string_lossy(),
            "skipped_types": skipped,
            "footprint": footprint,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_default()
        );
        return Ok(());
    }

    println!("{}", footprint);
    if output.verbose {
        println!();
        println!("Objects:    {}", footprint.objects());
        println!("References: {}", footprint.references());
        for (kind, count) in footprint.primitives() {
            println!("  {:<8} {}", kind.name(), count);
        }
    }

    Ok(())
}

// =============================================================================
// TRACE COMMAND
// =============================================================================

/// One explored object.
#[derive(Debug, Clone, Serialize)]
struct TraceEntry {
    path: String,
    type_name: String,
    depth: usize,
}

/// Records every object a measurement would explore, in visit order.
struct PathTracer<'h> {
    heap: &'h Heap,
    guard: AtMostOnce<ObjectId>,
    limit: Option<usize>,
    entries: Vec<TraceEntry>,
}

impl<'h> PathTracer<'h> {
    fn new(heap: &'h Heap, limit: Option<usize>) -> Self {
        Self {
            heap,
            guard: AtMostOnce::new(),
            limit,
            entries: Vec::new(),
        }
    }

    fn full(&self) -> bool {
        self.limit.is_some_and(|limit| self.entries.len() >= limit)
    }
}

impl ObjectVisitor<ObjectId> for PathTracer<'_> {
    type Output = Vec<TraceEntry>;

    fn visit(&mut self, chain: &Chain<ObjectId>) -> Traversal {
        if self.full() || chain.is_null() || chain.is_primitive() {
            return Traversal::Skip;
        }
        // Same shared-value rule as the measurement pipeline, root included.
        if !not_shared(chain) {
            return Traversal::Skip;
        }
        if !self.guard.apply(chain) {
            return Traversal::Skip;
        }

        let type_name = match chain.value() {
            Value::Object(handle) => self.heap.runtime_type(*handle).to_string(),
            Value::Primitive(value) => value.kind().boxed_name().to_string(),
            Value::Null => return Traversal::Skip,
        };
        self.entries.push(TraceEntry {
            path: chain.path(),
            type_name,
            depth: chain.depth(),
        });
        Traversal::Explore
    }

    fn result(self) -> Vec<TraceEntry> {
        self.entries
    }
}

/// Print the path of each explored object.
pub fn cmd_trace(
    config: &FootprintConfig,
    output: Output,
    file: &Path,
    limit: Option<usize>,
) -> Result<(), FootprintError> {
    let document = load_document(config, file)?;
    let tracer = PathTracer::new(&document.heap, limit);
    let entries = ObjectExplorer::explore(&document.heap, document.root, tracer, &Features::new());

    if output.json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).unwrap_or_default()
        );
        return Ok(());
    }

    for entry in &entries {
        if output.verbose {
            println!("{:>4}  {}  {}", entry.depth, entry.path, entry.type_name);
        } else {
            println!("{}  {}", entry.path, entry.type_name);
        }
    }
    if limit.is_some_and(|limit| entries.len() >= limit) {
        tracing::info!(limit = ?limit, "trace truncated");
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
