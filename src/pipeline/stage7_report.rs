use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::model::config::ScoringConfig;
use crate::model::tables::{
    AccuracyTable, AxisPair, DivergenceTable, EntropyTable, SummaryRow,
};
use crate::pipeline::stage6_composite::{CompositeRow, ObjectiveRow, Stage6Output};
use crate::pipeline::{ModelScores, Summaries};
use crate::report::json::{InputSummary, ModelRunSummary, RunSummary, render_summary_json};
use crate::report::{format_opt, format_score};

pub const ACCURACY_DIR: &str = "Accuracy";
pub const ENTROPY_DIR: &str = "Entropy_Ratio";
pub const DIVERGENCE_DIR: &str = "KL_Divergence";

pub const OBJECTIVE_FILE: &str = "t2i_objective_test_result.csv";
pub const FAIR_SCORE_FILE: &str = "t2i_fair_score_obj.csv";
// Historical name kept for downstream consumers.
pub const KLD_SCORE_FILE: &str = "t21_kld_score_obj.csv";
pub const RUN_SUMMARY_FILE: &str = "run_summary.json";

#[derive(Debug, Clone)]
pub struct Stage7Input<'a> {
    pub config: &'a ScoringConfig,
    pub models: &'a [ModelScores],
    pub summaries: &'a Summaries,
    pub composite: &'a Stage6Output,

    pub tool_name: String,
    pub tool_version: String,
    pub distributions_dir: String,
    pub ground_truth: String,
}

pub fn write_reports(input: &Stage7Input<'_>, out_dir: &Path) -> std::io::Result<()> {
    let accuracy_dir = out_dir.join(ACCURACY_DIR);
    let entropy_dir = out_dir.join(ENTROPY_DIR);
    let divergence_dir = out_dir.join(DIVERGENCE_DIR);
    for dir in [&accuracy_dir, &entropy_dir, &divergence_dir] {
        fs::create_dir_all(dir)?;
    }

    for model in input.models {
        write_accuracy_table(
            &model.accuracy.table,
            &accuracy_dir.join(format!("{}_accuracy.csv", model.key)),
        )?;
        write_entropy_table(
            &model.entropy,
            &entropy_dir.join(format!("{}_entropy_ratio.csv", model.key)),
        )?;
        write_divergence_table(
            &model.divergence.table,
            &divergence_dir.join(format!("{}_kl_divergence.csv", model.key)),
        )?;
    }

    write_summary_table(
        &input.summaries.accuracy,
        ["Model", "Gender Accuracy", "Race Accuracy"],
        format_opt,
        &accuracy_dir.join("accuracy_average.csv"),
    )?;
    write_summary_table(
        &input.summaries.entropy,
        ["Model", "Gender Entropy Ratio", "Race Entropy Ratio"],
        format_score,
        &entropy_dir.join("entropy_ratio_average.csv"),
    )?;
    write_summary_table(
        &input.summaries.divergence,
        ["Model", "Gender KL Divergence", "Race KL Divergence"],
        format_score,
        &divergence_dir.join("kl_divergence_average.csv"),
    )?;

    write_objective_table(&input.composite.objective, &out_dir.join(OBJECTIVE_FILE))?;
    write_composite_tables(
        &input.composite.composites,
        &out_dir.join(FAIR_SCORE_FILE),
        &out_dir.join(KLD_SCORE_FILE),
    )?;

    let summary = build_run_summary(input);
    write_text(&out_dir.join(RUN_SUMMARY_FILE), &render_summary_json(&summary)?)?;

    Ok(())
}

fn csv_writer(path: &Path) -> std::io::Result<csv::Writer<File>> {
    Ok(csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)?)
}

fn finish(mut w: csv::Writer<File>, path: &Path) -> std::io::Result<()> {
    w.flush()?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

fn write_accuracy_table(table: &AccuracyTable, path: &Path) -> std::io::Result<()> {
    let mut w = csv_writer(path)?;
    w.write_record(["Category", "High or Low", "Gender Accuracy", "Race Accuracy"])?;
    for row in &table.rows {
        w.write_record([
            row.category.clone(),
            row.direction.as_str().to_string(),
            format_opt(row.accuracy.gender),
            format_opt(row.accuracy.race),
        ])?;
    }
    if let Some(avg) = &table.average {
        w.write_record([
            "Average".to_string(),
            "N/A".to_string(),
            format_opt(avg.gender),
            format_opt(avg.race),
        ])?;
    }
    finish(w, path)
}

fn write_entropy_table(table: &EntropyTable, path: &Path) -> std::io::Result<()> {
    let mut w = csv_writer(path)?;
    w.write_record([
        "Category",
        "High or Low",
        "Gender Entropy Ratio",
        "Race Entropy Ratio",
    ])?;
    for row in &table.rows {
        w.write_record([
            row.category.clone(),
            row.direction.as_str().to_string(),
            format_score(row.ratio.gender),
            format_score(row.ratio.race),
        ])?;
    }
    if let Some(avg) = &table.average {
        w.write_record([
            "Average".to_string(),
            "N/A".to_string(),
            format_score(avg.gender),
            format_score(avg.race),
        ])?;
    }
    finish(w, path)
}

fn write_divergence_table(table: &DivergenceTable, path: &Path) -> std::io::Result<()> {
    let mut w = csv_writer(path)?;
    w.write_record(["Category", "Gender KL Divergence", "Race KL Divergence"])?;
    for row in &table.rows {
        w.write_record([
            row.category.clone(),
            format_score(row.divergence.gender),
            format_score(row.divergence.race),
        ])?;
    }
    if let Some(avg) = &table.average {
        w.write_record([
            "Average".to_string(),
            format_score(avg.gender),
            format_score(avg.race),
        ])?;
    }
    finish(w, path)
}

fn write_summary_table<T: Copy>(
    rows: &[SummaryRow<T>],
    header: [&str; 3],
    fmt: fn(T) -> String,
    path: &Path,
) -> std::io::Result<()> {
    let mut w = csv_writer(path)?;
    w.write_record(header)?;
    for row in rows {
        w.write_record([row.model.clone(), fmt(row.values.gender), fmt(row.values.race)])?;
    }
    finish(w, path)
}

fn write_objective_table(rows: &[ObjectiveRow], path: &Path) -> std::io::Result<()> {
    let mut w = csv_writer(path)?;
    w.write_record(["Model", "Attribute", "Accuracy", "Entropy Ratio"])?;
    for row in rows {
        w.write_record([
            row.model.clone(),
            row.attribute.name().to_string(),
            format_opt(row.accuracy),
            format_score(row.entropy_ratio),
        ])?;
    }
    finish(w, path)
}

fn write_composite_tables(
    rows: &[CompositeRow],
    fair_path: &Path,
    kld_path: &Path,
) -> std::io::Result<()> {
    let mut fair = csv_writer(fair_path)?;
    fair.write_record(["Model", "Gender Fair Score", "Race Fair Score"])?;
    let mut kld = csv_writer(kld_path)?;
    kld.write_record(["Model", "Gender KLD Score", "Race KLD Score"])?;

    for row in rows {
        fair.write_record([
            row.model.clone(),
            format_score(row.scores.gender.fair),
            format_score(row.scores.race.fair),
        ])?;
        kld.write_record([
            row.model.clone(),
            format_score(row.scores.gender.kld),
            format_score(row.scores.race.kld),
        ])?;
    }
    finish(fair, fair_path)?;
    finish(kld, kld_path)
}

fn build_run_summary(input: &Stage7Input<'_>) -> RunSummary {
    let mut models = Vec::with_capacity(input.models.len());
    for m in input.models {
        let display_name = input
            .config
            .models
            .iter()
            .find(|spec| spec.key == m.key)
            .map(|spec| spec.display_name.clone())
            .unwrap_or_else(|| m.key.clone());
        let composite = input
            .composite
            .composites
            .iter()
            .find(|row| row.model == m.key);

        models.push(ModelRunSummary {
            key: m.key.clone(),
            display_name,
            source: m.source.display().to_string(),
            records: m.records,
            ignored_labels: m.ignored_labels,
            accuracy_rows: m.accuracy.table.rows.len(),
            unmatched_categories: m.accuracy.unmatched.clone(),
            entropy_rows: m.entropy.rows.len(),
            divergence_rows: m.divergence.table.rows.len(),
            skipped_categories: m.divergence.skipped.clone(),
            accuracy: summary_for(&input.summaries.accuracy, &m.key),
            entropy_ratio: summary_for(&input.summaries.entropy, &m.key),
            kl_divergence: summary_for(&input.summaries.divergence, &m.key),
            fair_score: composite.map(|c| c.scores.map(|s| s.fair)),
            kld_score: composite.map(|c| c.scores.map(|s| s.kld)),
        });
    }

    RunSummary {
        tool: input.tool_name.clone(),
        version: input.tool_version.clone(),
        input: InputSummary {
            distributions: input.distributions_dir.clone(),
            ground_truth: input.ground_truth.clone(),
            label_policy: format!("{:?}", input.config.label_policy).to_lowercase(),
            gender_classes: input.config.gender_classes.labels().to_vec(),
            race_classes: input.config.race_classes.labels().to_vec(),
            decimals: input.config.decimals,
        },
        models,
    }
}

fn summary_for<T: Copy + Default>(rows: &[SummaryRow<T>], key: &str) -> AxisPair<T> {
    rows.iter()
        .find(|row| row.model == key)
        .map(|row| row.values)
        .unwrap_or_default()
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut f = File::create(path)?;
    f.write_all(contents.as_bytes())?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage7_report.rs"]
mod tests;
