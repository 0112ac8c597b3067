//! Prometheus configuration document and the scrape-target merge.
//!
//! The document is kept as an untyped `serde_yaml::Value` tree so that every
//! section this module does not understand (`global`, `alerting`,
//! `rule_files`, unknown job fields, ...) survives a merge unchanged and in
//! its original key order. Only `scrape_configs` is inspected or mutated.
//!
//! Pure functions only: no I/O, no async.

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::domain::error::ProvisionError;
use crate::domain::target::ScrapeTarget;

pub const SCRAPE_CONFIGS: &str = "scrape_configs";
pub const JOB_NAME: &str = "job_name";
pub const STATIC_CONFIGS: &str = "static_configs";
pub const TARGETS: &str = "targets";

/// A parsed `prometheus.yml`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Value,
}

/// How `merge_target` placed the new target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcome {
    /// Appended to the first static config of an existing job.
    AppendedToStaticConfig,
    /// The job existed with no static configs; a new block was added.
    AddedStaticConfig,
    /// No job had the requested name; a new job was appended.
    CreatedJob,
}

impl ConfigDocument {
    /// Parse YAML bytes. An empty document is treated as an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` if the bytes are not valid YAML.
    pub fn parse(bytes: &[u8]) -> Result<Self, ProvisionError> {
        let root: Value = serde_yaml::from_slice(bytes)
            .map_err(|e| ProvisionError::MalformedDocument(format!("invalid YAML: {e}")))?;
        Ok(Self { root })
    }

    /// Serialize back to YAML.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` if the tree cannot be represented as YAML.
    pub fn to_yaml(&self) -> Result<String, ProvisionError> {
        serde_yaml::to_string(&self.root)
            .map_err(|e| ProvisionError::MalformedDocument(format!("cannot serialize: {e}")))
    }

    /// Top-level section by name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }

    /// Targets listed across every static config of the first job named
    /// `job_name`. Entries that are not strings are skipped.
    #[must_use]
    pub fn job_targets(&self, job_name: &str) -> Vec<&str> {
        let Some(job) = self
            .root
            .get(SCRAPE_CONFIGS)
            .and_then(Value::as_sequence)
            .and_then(|jobs| find_job(jobs, job_name).map(|i| &jobs[i]))
        else {
            return Vec::new();
        };

        job.get(STATIC_CONFIGS)
            .and_then(Value::as_sequence)
            .into_iter()
            .flatten()
            .filter_map(|block| block.get(TARGETS).and_then(Value::as_sequence))
            .flatten()
            .filter_map(Value::as_str)
            .collect()
    }
}

/// Insert `target` into the job named `job_name`.
///
/// - first matching job, non-empty `static_configs`: append to the first
///   block's `targets`;
/// - first matching job, empty or missing `static_configs`: add
///   `{targets: [target]}`;
/// - no matching job: append `{job_name, static_configs: [{targets: [target]}]}`.
///
/// Duplicates are not filtered. Everything outside the touched job is left
/// as-is.
///
/// # Errors
///
/// Returns `MalformedDocument` when the document root is not a mapping,
/// `scrape_configs` is not a sequence of mappings, or the matched job's
/// `static_configs` / first block's `targets` have the wrong shape.
pub fn merge_target(
    doc: ConfigDocument,
    job_name: &str,
    target: &ScrapeTarget,
) -> Result<(ConfigDocument, MergeOutcome), ProvisionError> {
    let mut root = match doc.root {
        Value::Mapping(m) => m,
        Value::Null => Mapping::new(),
        other => {
            return Err(malformed(format!(
                "document root must be a mapping, found {}",
                describe(&other)
            )));
        }
    };

    let outcome = merge_into_jobs(job_list(&mut root)?, job_name, target)?;

    Ok((
        ConfigDocument {
            root: Value::Mapping(root),
        },
        outcome,
    ))
}

fn merge_into_jobs(
    jobs: &mut Vec<Value>,
    job_name: &str,
    target: &ScrapeTarget,
) -> Result<MergeOutcome, ProvisionError> {
    if let Some(bad) = jobs.iter().find(|job| !job.is_mapping()) {
        return Err(malformed(format!(
            "{SCRAPE_CONFIGS} entries must be mappings, found {}",
            describe(bad)
        )));
    }

    let Some(index) = find_job(jobs, job_name) else {
        jobs.push(new_job(job_name, target));
        return Ok(MergeOutcome::CreatedJob);
    };

    let job = jobs[index]
        .as_mapping_mut()
        .ok_or_else(|| malformed(format!("job '{job_name}' is not a mapping")))?;

    let blocks = ensure_sequence(job, STATIC_CONFIGS).map_err(|found| {
        malformed(format!(
            "job '{job_name}' {STATIC_CONFIGS} must be a sequence, found {found}"
        ))
    })?;

    if let Some(bad) = blocks.iter().find(|block| !block.is_mapping()) {
        return Err(malformed(format!(
            "job '{job_name}' {STATIC_CONFIGS} entries must be mappings, found {}",
            describe(bad)
        )));
    }

    match blocks.first_mut().and_then(Value::as_mapping_mut) {
        Some(first) => {
            let targets = ensure_sequence(first, TARGETS).map_err(|found| {
                malformed(format!(
                    "job '{job_name}' first static config {TARGETS} must be a sequence, found {found}"
                ))
            })?;
            targets.push(Value::from(target.to_string()));
            Ok(MergeOutcome::AppendedToStaticConfig)
        }
        None => {
            blocks.push(static_block(target));
            Ok(MergeOutcome::AddedStaticConfig)
        }
    }
}

/// The `scrape_configs` sequence, created at the end of the document when
/// absent or null.
fn job_list(root: &mut Mapping) -> Result<&mut Vec<Value>, ProvisionError> {
    ensure_sequence(root, SCRAPE_CONFIGS)
        .map_err(|found| malformed(format!("{SCRAPE_CONFIGS} must be a sequence, found {found}")))
}

/// Get `key` as a mutable sequence, inserting an empty one when the key is
/// missing or null. On a shape mismatch returns a description of what was found.
fn ensure_sequence<'a>(
    map: &'a mut Mapping,
    key: &str,
) -> Result<&'a mut Vec<Value>, &'static str> {
    let slot = map.entry(Value::from(key)).or_insert(Value::Null);
    if slot.is_null() {
        *slot = Value::Sequence(Vec::new());
    }
    match slot {
        Value::Sequence(seq) => Ok(seq),
        other => Err(describe(other)),
    }
}

fn find_job(jobs: &[Value], job_name: &str) -> Option<usize> {
    jobs.iter()
        .position(|job| job.get(JOB_NAME).and_then(Value::as_str) == Some(job_name))
}

fn static_block(target: &ScrapeTarget) -> Value {
    let mut block = Mapping::new();
    block.insert(
        Value::from(TARGETS),
        Value::Sequence(vec![Value::from(target.to_string())]),
    );
    Value::Mapping(block)
}

fn new_job(job_name: &str, target: &ScrapeTarget) -> Value {
    let mut job = Mapping::new();
    job.insert(Value::from(JOB_NAME), Value::from(job_name));
    job.insert(
        Value::from(STATIC_CONFIGS),
        Value::Sequence(vec![static_block(target)]),
    );
    Value::Mapping(job)
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn malformed(msg: String) -> ProvisionError {
    ProvisionError::MalformedDocument(msg)
}
