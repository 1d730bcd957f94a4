//! In-process aggregation pipeline
//!
//! A fixed sequence of stages over documents: match, left-join (lookup),
//! unwind, project and group. Execution is pure and synchronous so every
//! engine produces the same rows for the same input.

use std::collections::HashMap;

use serde_json::{Number, Value};

use super::store::{Document, Filter, resolve_path};

/// How a projected field is computed
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Value at a dotted path; `null` when the path does not resolve
    Path(String),
    /// Copy the field of the same name when present
    Include,
    /// `array[start..start + len]` of the array at `path`, clamped to its bounds
    Slice { path: String, start: usize, len: usize },
}

impl Projection {
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }
}

/// Per-group accumulator
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    /// Numeric sum; missing, null and non-numeric values add nothing
    Sum(String),
    /// Number of rows in the group
    Count,
    /// Every row of the group, as it entered the stage
    PushRoot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Filter),
    /// Attach under `as_field` the array of every `from` document whose
    /// `foreign_field` equals this document's `local_field`.
    Lookup {
        from: String,
        local_field: String,
        foreign_field: String,
        as_field: String,
    },
    /// One output row per array element. With `preserve_null_and_empty`, rows
    /// whose array is missing, null or empty are kept with the field removed.
    Unwind {
        path: String,
        preserve_null_and_empty: bool,
    },
    Project(Vec<(String, Projection)>),
    /// Group key fields are `(output name, source path)`; the key is exposed
    /// under `_id` (null for an empty key).
    Group {
        key: Vec<(String, String)>,
        accumulators: Vec<(String, Accumulator)>,
    },
}

/// Ordered list of stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Filter of a leading `Match`, so engines can narrow the initial scan
    pub fn leading_filter(&self) -> Filter {
        match self.stages.first() {
            Some(Stage::Match(filter)) => filter.clone(),
            _ => Filter::all(),
        }
    }

    /// Every collection a `Lookup` stage reads
    pub fn lookup_collections(&self) -> Vec<&str> {
        self.stages
            .iter()
            .filter_map(|stage| match stage {
                Stage::Lookup { from, .. } => Some(from.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Run every stage over `source`
    ///
    /// `foreign` holds the documents of each looked-up collection; a collection
    /// missing from the map joins nothing.
    pub fn execute(
        &self,
        source: Vec<Document>,
        foreign: &HashMap<String, Vec<Document>>,
    ) -> Vec<Document> {
        self.stages.iter().fold(source, |rows, stage| match stage {
            Stage::Match(filter) => rows.into_iter().filter(|d| filter.matches(d)).collect(),
            Stage::Lookup {
                from,
                local_field,
                foreign_field,
                as_field,
            } => {
                let others = foreign.get(from).map(Vec::as_slice).unwrap_or(&[]);
                lookup(rows, others, local_field, foreign_field, as_field)
            }
            Stage::Unwind {
                path,
                preserve_null_and_empty,
            } => unwind(rows, path, *preserve_null_and_empty),
            Stage::Project(fields) => rows.iter().map(|d| project(d, fields)).collect(),
            Stage::Group { key, accumulators } => group(rows, key, accumulators),
        })
    }
}

/// Missing and null compare equal, so a row without a local value joins
/// foreign rows that also lack the field.
fn join_key(value: Option<&Value>) -> &Value {
    static NULL: Value = Value::Null;
    value.unwrap_or(&NULL)
}

fn lookup(
    rows: Vec<Document>,
    others: &[Document],
    local_field: &str,
    foreign_field: &str,
    as_field: &str,
) -> Vec<Document> {
    rows.into_iter()
        .map(|mut row| {
            let local = join_key(resolve_path(&row, local_field)).clone();
            let matches: Vec<Value> = others
                .iter()
                .filter(|other| *join_key(resolve_path(other, foreign_field)) == local)
                .map(|other| Value::Object(other.clone()))
                .collect();
            row.insert(as_field.to_string(), Value::Array(matches));
            row
        })
        .collect()
}

fn unwind(rows: Vec<Document>, path: &str, preserve: bool) -> Vec<Document> {
    let mut out = Vec::with_capacity(rows.len());
    for mut row in rows {
        match row.get(path).cloned() {
            Some(Value::Array(items)) if !items.is_empty() => {
                for item in items {
                    let mut copy = row.clone();
                    copy.insert(path.to_string(), item);
                    out.push(copy);
                }
            }
            Some(Value::Array(_)) | Some(Value::Null) | None => {
                if preserve {
                    row.remove(path);
                    out.push(row);
                }
            }
            Some(_) => out.push(row),
        }
    }
    out
}

fn project(doc: &Document, fields: &[(String, Projection)]) -> Document {
    let mut out = Document::new();
    for (name, projection) in fields {
        match projection {
            Projection::Path(path) => {
                let value = resolve_path(doc, path).cloned().unwrap_or(Value::Null);
                out.insert(name.clone(), value);
            }
            Projection::Include => {
                if let Some(value) = doc.get(name) {
                    out.insert(name.clone(), value.clone());
                }
            }
            Projection::Slice { path, start, len } => {
                let sliced = match resolve_path(doc, path) {
                    Some(Value::Array(items)) => items
                        .iter()
                        .skip(*start)
                        .take(*len)
                        .cloned()
                        .collect(),
                    _ => Vec::new(),
                };
                out.insert(name.clone(), Value::Array(sliced));
            }
        }
    }
    out
}

struct GroupState {
    key: Value,
    sums: Vec<f64>,
    count: u64,
    rows: Vec<Value>,
}

fn group(
    rows: Vec<Document>,
    key: &[(String, String)],
    accumulators: &[(String, Accumulator)],
) -> Vec<Document> {
    let sum_paths: Vec<&str> = accumulators
        .iter()
        .filter_map(|(_, acc)| match acc {
            Accumulator::Sum(path) => Some(path.as_str()),
            _ => None,
        })
        .collect();

    let mut groups: Vec<GroupState> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let group_key = if key.is_empty() {
            Value::Null
        } else {
            Value::Object(
                key.iter()
                    .map(|(name, path)| {
                        let value = resolve_path(&row, path).cloned().unwrap_or(Value::Null);
                        (name.clone(), value)
                    })
                    .collect(),
            )
        };

        let slot = *index.entry(group_key.to_string()).or_insert_with(|| {
            groups.push(GroupState {
                key: group_key.clone(),
                sums: vec![0.0; sum_paths.len()],
                count: 0,
                rows: Vec::new(),
            });
            groups.len() - 1
        });

        let state = &mut groups[slot];
        for (i, path) in sum_paths.iter().enumerate() {
            if let Some(n) = resolve_path(&row, path).and_then(Value::as_f64) {
                state.sums[i] += n;
            }
        }
        state.count += 1;
        state.rows.push(Value::Object(row));
    }

    groups
        .into_iter()
        .map(|state| {
            let mut out = Document::new();
            out.insert("_id".to_string(), state.key);
            let mut sums = state.sums.into_iter();
            let mut rows = Some(state.rows);
            for (name, acc) in accumulators {
                let value = match acc {
                    Accumulator::Sum(_) => number(sums.next().unwrap_or(0.0)),
                    Accumulator::Count => Value::from(state.count),
                    Accumulator::PushRoot => Value::Array(rows.take().unwrap_or_default()),
                };
                out.insert(name.clone(), value);
            }
            out
        })
        .collect()
}

fn number(n: f64) -> Value {
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}
