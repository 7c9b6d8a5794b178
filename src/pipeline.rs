//
//  pipeline.rs
//  Comprehender
//
//  Created by hak (tharun)
//

use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::annotate::{collect_comments, write_commented_file};
use crate::config::ComprehendConfig;
use crate::describe::Describer;
use crate::discover::{compile_patterns, discover_sources, SourceSet};
use crate::error::{ComprehendError, Result};
use crate::extract::extract_source;
use crate::graph::{derive_relationships, DependencyGraph, GraphStats, Relationship};
use crate::model::SourceUnit;
use crate::render::render_diagram;
use crate::symbols::SymbolIndex;
use crate::syntax::source_lines;

/// One file that made it through extraction, with the text it was read from.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub unit: SourceUnit,
    pub source: String,
}

/// Result of both passes over a project.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub index: SymbolIndex,
    /// In discovery order.
    pub files: Vec<ProcessedFile>,
    pub skipped: Vec<PathBuf>,
    pub relationships: BTreeSet<Relationship>,
}

impl Analysis {
    pub fn units(&self) -> impl Iterator<Item = &SourceUnit> {
        self.files.iter().map(|f| &f.unit)
    }

    pub fn entity_count(&self) -> usize {
        self.units().map(|u| u.types.len()).sum()
    }
}

fn process_file(path: &Path, index: &SymbolIndex) -> Result<ProcessedFile> {
    let source = fs::read_to_string(path).map_err(|source| ComprehendError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let unit = extract_source(path, &source, index)?;
    Ok(ProcessedFile { unit, source })
}

/// Index every discovered file, then extract the selected ones.
///
/// The index is complete before extraction starts. A file that fails to read,
/// parse or extract is logged and left out; the rest are unaffected.
pub fn analyze(sources: &SourceSet, parallel: bool) -> Analysis {
    let index = SymbolIndex::build(&sources.all);

    let outcomes: Vec<(&PathBuf, Result<ProcessedFile>)> = if parallel {
        sources
            .selected
            .par_iter()
            .map(|path| (path, process_file(path, &index)))
            .collect()
    } else {
        sources
            .selected
            .iter()
            .map(|path| (path, process_file(path, &index)))
            .collect()
    };

    let mut files = Vec::with_capacity(outcomes.len());
    let mut skipped = Vec::new();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(file) => {
                debug!(path = %path.display(), types = file.unit.types.len(), "extracted file");
                files.push(file);
            }
            Err(e) if e.is_syntax_error() => {
                warn!(path = %path.display(), error = %e, "skipping file with syntax error");
                skipped.push(path.clone());
            }
            Err(e) => {
                error!(
                    path = %path.display(),
                    error = %e,
                    error_debug = ?e,
                    "failed to extract file"
                );
                skipped.push(path.clone());
            }
        }
    }

    let relationships = derive_relationships(files.iter().map(|f| &f.unit));
    info!(
        processed = files.len(),
        skipped = skipped.len(),
        relationships = relationships.len(),
        "analysis complete"
    );

    Analysis {
        index,
        files,
        skipped,
        relationships,
    }
}

/// Summary of one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub files_found: usize,
    pub files_excluded: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub entities: usize,
    pub relationships: usize,
    pub graph: GraphStats,
    pub cycles: Vec<Vec<String>>,
    /// Every file written, in write order.
    pub outputs: Vec<PathBuf>,
}

/// End-to-end run: discovery, analysis and every output document.
pub struct Pipeline {
    config: ComprehendConfig,
    describer: Box<dyn Describer>,
    diagram_only: bool,
}

impl Pipeline {
    pub fn new(config: ComprehendConfig, describer: Box<dyn Describer>) -> Self {
        Self {
            config,
            describer,
            diagram_only: false,
        }
    }

    /// Skip commented copies, the overview and the simplified diagram.
    pub fn diagram_only(mut self, diagram_only: bool) -> Self {
        self.diagram_only = diagram_only;
        self
    }

    pub fn config(&self) -> &ComprehendConfig {
        &self.config
    }

    pub fn run(&self, source_dir: &Path, output_dir: &Path) -> Result<RunReport> {
        let exclude = compile_patterns(&self.config.project.exclude)?;
        let sources = discover_sources(source_dir, &self.config.project.extension, &exclude)?;

        fs::create_dir_all(output_dir).map_err(|source| ComprehendError::Write {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let analysis = analyze(&sources, self.config.pipeline.parallel);
        if analysis.files.is_empty() {
            return Err(ComprehendError::NothingProcessed);
        }

        let units: Vec<SourceUnit> = analysis.units().cloned().collect();
        let graph = DependencyGraph::from_units(&units);
        let cycles = graph.cycles();
        for cycle in &cycles {
            debug!(types = %cycle.join(" -> "), "dependency cycle");
        }

        let mut report = RunReport {
            files_found: sources.all.len(),
            files_excluded: sources.excluded_count(),
            files_processed: analysis.files.len(),
            files_skipped: analysis.skipped.len(),
            entities: analysis.entity_count(),
            relationships: analysis.relationships.len(),
            graph: graph.stats(),
            cycles,
            outputs: Vec::new(),
        };

        if !self.diagram_only {
            self.write_commented_files(&analysis, output_dir, &mut report);
        }

        let output = &self.config.output;
        let structure = serde_json::to_string_pretty(&units)?;
        report
            .outputs
            .push(write_output(&output_dir.join(&output.structure_file), &structure)?);

        let diagram = render_diagram(&units, &analysis.relationships, &output.diagram_title);
        report
            .outputs
            .push(write_output(&output_dir.join(&output.diagram_file), &diagram)?);

        if !self.diagram_only {
            if self.config.llm.suggestions {
                match self.describer.overview(&structure) {
                    Some(text) => report
                        .outputs
                        .push(write_output(&output_dir.join(&output.overview_file), &text)?),
                    None => info!("no project overview generated"),
                }
            }
            match self.describer.simplify_diagram(&diagram) {
                Some(text) => report.outputs.push(write_output(
                    &output_dir.join(&output.simplified_diagram_file),
                    &text,
                )?),
                None => info!("no simplified diagram generated"),
            }
        }

        info!(
            processed = report.files_processed,
            skipped = report.files_skipped,
            entities = report.entities,
            outputs = report.outputs.len(),
            "processing complete"
        );
        Ok(report)
    }

    /// Describe and write each file; a failed write is logged and skipped.
    fn write_commented_files(
        &self,
        analysis: &Analysis,
        output_dir: &Path,
        report: &mut RunReport,
    ) {
        let total = analysis.files.len();
        for (i, file) in analysis.files.iter().enumerate() {
            info!(file = i + 1, total, path = %file.unit.path.display(), "describing file");
            let comments = collect_comments(&file.unit, self.describer.as_ref());
            let lines = source_lines(&file.source);
            match write_commented_file(&file.unit, &lines, &comments, output_dir) {
                Ok(path) => report.outputs.push(path),
                Err(e) => error!(
                    path = %file.unit.path.display(),
                    error = %e,
                    "failed to write commented file"
                ),
            }
        }
    }
}

fn write_output(path: &Path, contents: &str) -> Result<PathBuf> {
    fs::write(path, contents).map_err(|source| ComprehendError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "wrote output");
    Ok(path.to_path_buf())
}
