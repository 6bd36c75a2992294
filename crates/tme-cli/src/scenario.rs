//! JSON edit scenarios.
//!
//! A scenario declares an environment, a map, and a list of edit steps:
//!
//! ```json
//! {
//!   "environment": "station",
//!   "types": [
//!     { "path": "/obj", "vars": [["name", "\"object\""], ["density", "0"]] },
//!     { "path": "/obj/table", "vars": [["density", "1"]] }
//!   ],
//!   "map": { "name": "bar", "width": 8, "height": 8, "depth": 1 },
//!   "steps": [
//!     { "op": "place", "type": "/obj/table", "at": { "x": 2, "y": 3, "z": 1 } },
//!     { "op": "set", "at": { "x": 2, "y": 3, "z": 1 }, "index": 0, "vars": [["dir", "4"]] },
//!     { "op": "undo" }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tme_map::{Bounds, Environment, Instance, Map, MapResult};
use tme_session::{EditSession, EditorConfig, NoRedraw, Selection};
use tme_types::{Point, StateId, TypePath};
use tme_vars::VariablesBuilder;
use tracing::info;

#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_environment")]
    pub environment: String,
    pub types: Vec<TypeDef>,
    #[serde(default)]
    pub map: Option<MapDef>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_environment() -> String {
    "environment".to_string()
}

#[derive(Clone, Debug, Deserialize)]
pub struct TypeDef {
    pub path: TypePath,
    #[serde(default)]
    pub vars: Vec<(String, String)>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MapDef {
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_depth")]
    pub depth: u32,
}

fn default_depth() -> u32 {
    1
}

/// One edit step. Everything except `select` and `paint` commits.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Step {
    /// Pick the instance later `paint` steps place.
    Select {
        #[serde(rename = "type")]
        path: TypePath,
        #[serde(default)]
        vars: Vec<(String, String)>,
    },
    /// Add the selected instance without committing.
    Paint { at: Point },
    Commit {
        #[serde(default = "default_commit_label")]
        label: String,
    },
    Place {
        #[serde(rename = "type")]
        path: TypePath,
        at: Point,
        #[serde(default)]
        vars: Vec<(String, String)>,
    },
    Set {
        at: Point,
        index: usize,
        vars: Vec<(String, String)>,
    },
    Remove { at: Point, index: usize },
    Undo,
    Redo,
}

fn default_commit_label() -> String {
    "Commit".to_string()
}

impl Step {
    pub fn op(&self) -> &'static str {
        match self {
            Step::Select { .. } => "select",
            Step::Paint { .. } => "paint",
            Step::Commit { .. } => "commit",
            Step::Place { .. } => "place",
            Step::Set { .. } => "set",
            Step::Remove { .. } => "remove",
            Step::Undo => "undo",
            Step::Redo => "redo",
        }
    }
}

/// What one step did.
#[derive(Clone, Debug, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub op: &'static str,
    /// `false` for undo/redo with nothing to act on, or a paint without a
    /// selection.
    pub applied: bool,
    pub state: StateId,
    pub detail: String,
}

impl Scenario {
    pub fn from_json_str(source: &str) -> anyhow::Result<Self> {
        serde_json::from_str(source).context("invalid scenario")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read scenario {}", path.display()))?;
        Self::from_json_str(&source)
    }

    pub fn build_environment(&self) -> MapResult<Environment> {
        let mut builder = Environment::builder(self.environment.as_str());
        for def in &self.types {
            let vars: VariablesBuilder = def.vars.iter().cloned().collect();
            builder.define(def.path.clone(), vars)?;
        }
        builder.build()
    }

    /// A fresh map as declared, or one of the configured default size.
    pub fn build_map(&self, config: &EditorConfig) -> MapResult<Map> {
        Ok(match &self.map {
            Some(def) => Map::new(
                def.name.as_str(),
                Bounds::new(def.width, def.height, def.depth)?,
            ),
            None => Map::new("untitled", config.default_map),
        })
    }
}

/// The outcome of running a scenario.
pub struct Run {
    pub environment: Environment,
    pub session: EditSession,
    pub reports: Vec<StepReport>,
}

/// Build the scenario's environment and map, then apply every step in order.
/// Stops at the first failing step.
pub fn run(scenario: &Scenario, config: &EditorConfig) -> anyhow::Result<Run> {
    let environment = scenario
        .build_environment()
        .context("cannot build environment")?;
    let map = scenario.build_map(config)?;
    let mut session = EditSession::new(map, NoRedraw).with_undo_limit(config.history_limit());
    let mut selection = Selection::new();

    let mut reports = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let (applied, detail) = apply_step(&environment, &mut session, &mut selection, step)
            .with_context(|| format!("step {} ({}) failed", index + 1, step.op()))?;
        reports.push(StepReport {
            index: index + 1,
            op: step.op(),
            applied,
            state: session.state_id(),
            detail,
        });
    }
    info!(steps = reports.len(), state = %session.state_id(), "scenario finished");

    Ok(Run {
        environment,
        session,
        reports,
    })
}

fn instance(
    environment: &Environment,
    path: &TypePath,
    vars: &[(String, String)],
) -> MapResult<Arc<Instance>> {
    let prototype = environment.prototype(path)?;
    Ok(Arc::new(Instance::with_overrides(prototype, vars.iter().cloned())))
}

fn apply_step(
    environment: &Environment,
    session: &mut EditSession,
    selection: &mut Selection,
    step: &Step,
) -> anyhow::Result<(bool, String)> {
    Ok(match step {
        Step::Select { path, vars } => {
            let picked = instance(environment, path, vars)?;
            let detail = format!("selected {}", picked.name());
            selection.select(picked);
            (true, detail)
        }
        Step::Paint { at } => {
            let applied = session.add_selected_instance(*at, &*selection)?;
            let detail = if applied {
                format!("painted {at}")
            } else {
                "nothing selected".to_string()
            };
            (applied, detail)
        }
        Step::Commit { label } => {
            let id = session.commit_changes(label);
            (true, format!("committed {id}"))
        }
        Step::Place { path, at, vars } => {
            let placed = instance(environment, path, vars)?;
            session.place_instance(*at, placed)?;
            (true, format!("placed {path} at {at}"))
        }
        Step::Set { at, index, vars } => {
            session.set_instance_vars(*at, *index, |builder| {
                builder.extend(vars.iter().cloned());
            })?;
            (true, format!("edited #{index} at {at}"))
        }
        Step::Remove { at, index } => {
            session.remove_instance(*at, *index)?;
            (true, format!("removed #{index} at {at}"))
        }
        Step::Undo => {
            let label = session.undo_label().map(str::to_string);
            let applied = session.undo();
            (applied, undo_detail("undid", label, applied))
        }
        Step::Redo => {
            let label = session.redo_label().map(str::to_string);
            let applied = session.redo();
            (applied, undo_detail("redid", label, applied))
        }
    })
}

fn undo_detail(verb: &str, label: Option<String>, applied: bool) -> String {
    match (applied, label) {
        (true, Some(label)) => format!("{verb} {label}"),
        _ => "nothing to do".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BAR: &str = r#"{
        "environment": "station",
        "types": [
            { "path": "/obj", "vars": [["name", "\"object\""], ["density", "0"]] },
            { "path": "/obj/table", "vars": [["density", "1"]] },
            { "path": "/turf/floor" }
        ],
        "map": { "name": "bar", "width": 4, "height": 4 },
        "steps": [
            { "op": "place", "type": "/obj/table", "at": { "x": 2, "y": 3, "z": 1 } },
            { "op": "set", "at": { "x": 2, "y": 3, "z": 1 }, "index": 0, "vars": [["dir", "4"]] },
            { "op": "select", "type": "/turf/floor" },
            { "op": "paint", "at": { "x": 1, "y": 1, "z": 1 } },
            { "op": "paint", "at": { "x": 2, "y": 1, "z": 1 } },
            { "op": "commit", "label": "Paint floor" },
            { "op": "undo" },
            { "op": "undo" },
            { "op": "redo" }
        ]
    }"#;

    #[test]
    fn scenario_runs_to_expected_state() {
        let scenario = Scenario::from_json_str(BAR).unwrap();
        let run = run(&scenario, &EditorConfig::default()).unwrap();

        let states: Vec<u64> = run.reports.iter().map(|r| r.state.value()).collect();
        assert_eq!(states, vec![1, 2, 2, 2, 2, 3, 2, 1, 2]);
        assert_eq!(run.reports[6].detail, "undid Paint floor");

        let map = run.session.map();
        assert_eq!(map.name(), "bar");
        assert!(map.tile(Point::flat(1, 1)).unwrap().is_empty());
        let table = map.instance(Point::flat(2, 3), 0).unwrap();
        assert_eq!(table.vars().int("dir"), Some(4));
        assert_eq!(table.vars().int("density"), Some(1));
        assert_eq!(run.environment.name(), "station");
    }

    #[test]
    fn missing_map_uses_config_default() {
        let scenario = Scenario::from_json_str(r#"{ "types": [] }"#).unwrap();
        let config = EditorConfig::default();
        let map = scenario.build_map(&config).unwrap();
        assert_eq!(map.bounds(), config.default_map);
        assert_eq!(scenario.environment, "environment");
    }

    #[test]
    fn oversized_map_fails_to_build() {
        let scenario = Scenario::from_json_str(
            r#"{ "types": [], "map": { "name": "m", "width": 4294967295, "height": 4294967295, "depth": 4294967295 } }"#,
        )
        .unwrap();
        let err = scenario.build_map(&EditorConfig::default()).unwrap_err();
        assert!(matches!(err, tme_map::MapError::InvalidDimensions { .. }));
    }

    #[test]
    fn undo_on_fresh_map_is_reported_not_failed() {
        let scenario = Scenario::from_json_str(
            r#"{ "types": [], "map": { "name": "m", "width": 1, "height": 1 }, "steps": [{ "op": "undo" }] }"#,
        )
        .unwrap();
        let run = run(&scenario, &EditorConfig::default()).unwrap();
        assert!(!run.reports[0].applied);
        assert_eq!(run.reports[0].detail, "nothing to do");
    }

    #[test]
    fn failing_step_names_its_position() {
        let scenario = Scenario::from_json_str(
            r#"{
                "types": [{ "path": "/obj" }],
                "map": { "name": "m", "width": 2, "height": 2 },
                "steps": [
                    { "op": "place", "type": "/obj", "at": { "x": 1, "y": 1, "z": 1 } },
                    { "op": "remove", "at": { "x": 1, "y": 1, "z": 1 }, "index": 5 }
                ]
            }"#,
        )
        .unwrap();
        let err = run(&scenario, &EditorConfig::default()).err().unwrap();
        assert!(err.to_string().contains("step 2 (remove)"));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let scenario = Scenario::from_json_str(
            r#"{ "types": [], "steps": [{ "op": "place", "type": "/mob", "at": { "x": 1, "y": 1, "z": 1 } }] }"#,
        )
        .unwrap();
        assert!(run(&scenario, &EditorConfig::default()).is_err());
    }

    #[test]
    fn invalid_type_path_fails_to_parse() {
        let result = Scenario::from_json_str(r#"{ "types": [{ "path": "obj" }] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BAR.as_bytes()).unwrap();
        let scenario = Scenario::load(file.path()).unwrap();
        assert_eq!(scenario.steps.len(), 9);
        assert_eq!(scenario.types.len(), 3);
    }
}
