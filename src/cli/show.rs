//! Detailed rendering for `medlearn show`.
//!
//! Catalog entries print every field. Envelopes print the requested level,
//! then their framework or pathway details and cross-references.

use anyhow::Result;
use serde::Serialize;

use crate::domain::{
    ContentEnvelope, DiagnosticPathway, Framework, HistoryFramework, Level, PhysicalExamApproach,
    Urgency,
};
use crate::library::{
    self, get_framework_by_acronym, AllergyImmunologyEntry, ClinicalReasoningEntry,
    DifferentialDiagnosisEntry, EntryRef, HistoryTakingEntry,
};

const RULE_WIDTH: usize = 72;

/// JSON shape of `show --json`
#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
    collection: &'a str,
    level: Level,
    entry: EntryRef<'a>,
}

/// Find an entry by id, falling back to a framework acronym
pub fn find_entry(id: &str) -> Option<EntryRef<'static>> {
    library::library()
        .lookup(id)
        .or_else(|| get_framework_by_acronym(id).map(EntryRef::Envelope))
}

/// Show an entry at `level`
pub fn show_entry(id: &str, level: Level, json: bool) -> Result<()> {
    let entry = find_entry(id).ok_or_else(|| anyhow::anyhow!("Entry not found: {}", id))?;
    let collection = library::library()
        .collection_of(entry.id())
        .unwrap_or_default();

    if json {
        let output = ShowOutput {
            collection,
            level,
            entry,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match entry {
        EntryRef::ClinicalReasoning(e) => print_clinical_reasoning(e),
        EntryRef::AllergyImmunology(e) => print_allergy(e),
        EntryRef::HistoryTaking(e) => print_history_entry(e),
        EntryRef::Differential(e) => print_differential(e),
        EntryRef::Envelope(e) => print_envelope(e, level),
    }

    Ok(())
}

fn header(title: &str, subtitle: &str) {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("  {}", title);
    println!("  {}", subtitle);
    println!("{}", "=".repeat(RULE_WIDTH));
}

fn section(title: &str, body: &str) {
    if body.trim().is_empty() {
        return;
    }
    println!("\n--- {} ---\n", title);
    println!("{}", body.trim_end());
}

fn bullets(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n--- {} ---\n", title);
    for item in items {
        println!("  - {}", item);
    }
}

fn print_clinical_reasoning(entry: &ClinicalReasoningEntry) {
    header(&entry.name, &format!("{} | {}", entry.id, entry.category.label()));
    println!("\n{}", entry.description);
    section("Concept", &entry.concept_explanation);
    section("Clinical application", &entry.clinical_application);
    bullets("Examples", &entry.examples);
    bullets("Pitfalls", &entry.pitfalls);
    bullets("Key pearls", &entry.key_pearls);
    bullets("References", &entry.references);
}

fn print_allergy(entry: &AllergyImmunologyEntry) {
    header(&entry.name, &format!("{} | {}", entry.id, entry.category));
    println!("\n{}", entry.description);
    section("Pathophysiology", &entry.pathophysiology);
    section("Clinical presentation", &entry.clinical_presentation);
    section("Diagnostic workup", &entry.diagnostic_workup);
    section("Management", &entry.management);
    section("Complications", &entry.complications);
    bullets("Key pearls", &entry.key_pearls);
    bullets("References", &entry.references);
}

fn print_history_entry(entry: &HistoryTakingEntry) {
    header(&entry.name, &format!("{} | {}", entry.id, entry.category));
    println!("\n{}", entry.description);
    if let Some(mnemonics) = &entry.mnemonics {
        section("Mnemonic", mnemonics);
    }
    bullets("Key questions", &entry.key_questions);
    bullets("Red flags", &entry.red_flags);
    section("Clinical pearl", &entry.clinical_pearl);
    section("Documentation", &entry.documentation_tips);
}

fn print_differential(entry: &DifferentialDiagnosisEntry) {
    header(&entry.chief_complaint, &format!("{} | {}", entry.id, entry.category));
    bullets("Must not miss", &entry.emergency_ddx);
    bullets("Common", &entry.common_ddx);
    bullets("Uncommon", &entry.uncommon_ddx);
    bullets("Key questions", &entry.key_questions);
    bullets("Red flags", &entry.red_flags);
    bullets("Initial workup", &entry.initial_workup);
    section("Clinical pearl", &entry.clinical_pearl);
}

fn print_envelope(envelope: &ContentEnvelope, level: Level) {
    let content = envelope.level(level);

    header(
        &envelope.name,
        &format!(
            "{} | {} | Level {}: {}",
            envelope.id,
            envelope.content_type,
            level,
            level.name()
        ),
    );
    if !envelope.alternate_names.is_empty() {
        println!("  Also known as: {}", envelope.alternate_names.join(", "));
    }

    println!("\n{}", content.summary);
    section("Explanation", &content.explanation);

    if !content.key_terms.is_empty() {
        println!("\n--- Key terms ---\n");
        for term in &content.key_terms {
            match &term.pronunciation {
                Some(p) => println!("  {} ({}): {}", term.term, p, term.definition),
                None => println!("  {}: {}", term.term, term.definition),
            }
        }
    }
    bullets("Analogies", &content.analogies);
    bullets("Examples", &content.examples);
    if let Some(notes) = &content.clinical_notes {
        section("Clinical notes", notes);
    }
    if let Some(points) = &content.patient_counseling_points {
        bullets("Counseling points", points);
    }

    match &envelope.framework {
        Some(Framework::History(history)) => print_history(history, level),
        Some(Framework::PhysicalExam(exam)) => print_exam(exam, level),
        None => {}
    }
    if let Some(pathway) = &envelope.pathway {
        print_pathway(pathway, level);
    }

    let resolved = library::library().resolved_cross_references(envelope);
    if !resolved.is_empty() {
        println!("\n--- See also ---\n");
        for (reference, target) in resolved {
            match target {
                Some(target) => println!("  {} ({})", reference.label, target.id()),
                None => println!("  {} (not available)", reference.label),
            }
        }
    }
}

fn print_history(history: &HistoryFramework, level: Level) {
    println!("\n--- {}: {} ---\n", history.acronym, history.full_name);
    if !history.applicable_to.is_empty() {
        println!("  Applies to: {}\n", history.applicable_to.join(", "));
    }

    for (letter, questions) in history.questions_at(level) {
        let meaning = history
            .component(letter)
            .map(|c| c.meaning.as_str())
            .unwrap_or_default();
        println!("  [{}] {}", letter, meaning);
        for question in questions {
            println!("      - {}", question);
        }
    }

    for case in history.sample_cases_at(level) {
        println!("\n--- Sample case ---\n");
        println!("  {}", case.presentation);
        for component in &history.components {
            if let Some(answer) = case.application_of_framework.get(&component.letter) {
                println!("    {}: {}", component.letter, answer);
            }
        }
    }
}

fn print_exam(exam: &PhysicalExamApproach, level: Level) {
    println!("\n--- Examination: {} ({}) ---", exam.body_system, exam.region);

    for step in exam.steps_at(level) {
        let details = step.details;
        println!("\n  {}. {} [{}]", step.step, step.technique, details.patient_position);
        println!("     {}", step.description);
        println!("     Normal: {}", details.normal_findings);
        for finding in &details.abnormal_findings {
            println!("     Abnormal: {} - {}", finding.finding, finding.significance);
        }
        if let Some(equipment) = &details.equipment_needed {
            println!("     Equipment: {}", equipment.join(", "));
        }
        if let Some(pearl) = &details.clinical_pearl {
            println!("     Pearl: {}", pearl);
        }
    }

    if !exam.special_tests.is_empty() {
        println!("\n--- Special tests ---");
        for test in &exam.special_tests {
            println!("\n  {}", test.name);
            println!("     Indication: {}", test.indication);
            println!("     Technique: {}", test.technique);
            println!("     Positive: {}", test.interpretation.positive);
            println!("     Negative: {}", test.interpretation.negative);
            if let (Some(sn), Some(sp)) = (test.sensitivity, test.specificity) {
                println!(
                    "     Sensitivity {:.0}%, specificity {:.0}%",
                    sn * 100.0,
                    sp * 100.0
                );
            }
        }
    }
}

fn print_pathway(pathway: &DiagnosticPathway, level: Level) {
    println!("\n--- Pathway: {} ---", pathway.presentation);
    if !pathway.icd_codes.is_empty() {
        println!("  ICD-10: {}", pathway.icd_codes.join(", "));
    }

    for step in pathway.steps_at(level) {
        let marker = if step.details.is_red_flag { " !" } else { "" };
        println!("\n  [{}] {}{}", step.step_type, step.id, marker);
        println!("     {}", step.content);
        for (next, target) in pathway.next_steps(step.details) {
            let suffix = if target.is_some() { "" } else { " (not available)" };
            println!("     -> {}: {}{}", next.condition, next.target_step_id, suffix);
        }
        if let Some(pearl) = &step.details.clinical_pearl {
            println!("     Pearl: {}", pearl);
        }
    }

    if !pathway.differentials.is_empty() {
        println!("\n--- Differentials ---");
        for urgency in [Urgency::Emergent, Urgency::Urgent, Urgency::Routine] {
            for differential in pathway.differentials_with_urgency(urgency) {
                println!("  [{}] {}", urgency, differential.diagnosis);
            }
        }
    }

    if !pathway.red_flags.is_empty() {
        println!("\n--- Red flags ---");
        for flag in &pathway.red_flags {
            println!("  {}: {} ({})", flag.finding, flag.implication, flag.action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_entry_by_id_or_acronym() {
        assert_eq!(find_entry("anchoring-bias").unwrap().name(), "Anchoring Bias");
        assert_eq!(find_entry("oldcarts").unwrap().id(), "history-oldcarts");
        assert!(find_entry("not-an-entry").is_none());

        assert!(matches!(
            find_entry("chest-pain"),
            Some(EntryRef::Differential(_))
        ));
        assert!(matches!(
            find_entry("hpi-oldcarts"),
            Some(EntryRef::HistoryTaking(_))
        ));
        assert!(matches!(
            find_entry("algorithm-chest-pain"),
            Some(EntryRef::Envelope(e)) if e.pathway.is_some()
        ));
    }

    #[test]
    fn test_show_unknown_entry_fails() {
        let err = show_entry("not-an-entry", Level::Patient, false).unwrap_err();
        assert!(err.to_string().contains("Entry not found"));
    }
}
