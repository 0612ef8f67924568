use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::{PlannerError, Result};
use crate::models::{Disease, HealthProfile};

/// Minimum Jaro-Winkler similarity for a fuzzy disease match.
const FUZZY_THRESHOLD: f64 = 0.7;

/// Known diseases ranked by similarity to `input`, best first.
///
/// An input that parses to a known disease (code or Korean name) is returned
/// alone with similarity 1.0.
pub fn match_disease(input: &str) -> Vec<(Disease, f64)> {
    let parsed = Disease::parse(input);
    if !matches!(parsed, Disease::Other(_)) {
        return vec![(parsed, 1.0)];
    }

    let needle = input.trim().to_lowercase().replace([' ', '-'], "_");
    let mut candidates: Vec<(Disease, f64)> = Disease::KNOWN
        .iter()
        .map(|d| (d.clone(), jaro_winkler(d.code(), &needle)))
        .filter(|(_, score)| *score > FUZZY_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates
}

/// Split a comma-separated answer into trimmed, non-empty items.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn prompt_number<T: std::str::FromStr>(prompt: &str, default: &str) -> Result<T> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| PlannerError::InvalidInput("Invalid number".to_string()))
}

fn prompt_list(prompt: &str) -> Result<Vec<String>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(split_list(&input))
}

/// Prompt for diseases one at a time with fuzzy matching.
pub fn prompt_diseases() -> Result<Vec<Disease>> {
    let mut diseases = Vec::new();

    loop {
        let input: String = Input::new()
            .with_prompt("Enter a condition (or press Enter to finish)")
            .allow_empty(true)
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            break;
        }

        let candidates = match_disease(input);

        if candidates.is_empty() {
            let keep = Confirm::new()
                .with_prompt(format!("'{}' has no built-in rules. Keep it anyway?", input))
                .default(false)
                .interact()?;
            if keep {
                diseases.push(Disease::parse(input));
            }
            continue;
        }

        let chosen = if candidates.len() == 1 {
            let disease = candidates[0].0.clone();
            let exact = candidates[0].1 >= 1.0;
            let confirm = exact
                || Confirm::new()
                    .with_prompt(format!("Did you mean '{}'?", disease))
                    .default(true)
                    .interact()?;
            confirm.then_some(disease)
        } else {
            let mut selection_options: Vec<String> =
                candidates.iter().map(|(d, _)| d.to_string()).collect();
            selection_options.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt("Which did you mean?")
                .items(&selection_options)
                .default(0)
                .interact()?;

            candidates.get(selection).map(|(d, _)| d.clone())
        };

        if let Some(disease) = chosen {
            if !diseases.contains(&disease) {
                println!("Added: {}", disease);
                diseases.push(disease);
            }
        }
    }

    Ok(diseases)
}

fn prompt_trimester() -> Result<Option<u8>> {
    let options = ["Not pregnant", "1st trimester", "2nd trimester", "3rd trimester"];
    let selection = Select::new()
        .with_prompt("Pregnancy")
        .items(&options)
        .default(0)
        .interact()?;

    Ok(match selection {
        0 => None,
        n => Some(n as u8),
    })
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Build a health profile interactively.
pub fn collect_profile() -> Result<HealthProfile> {
    let age: u32 = prompt_number("Age", "30")?;
    let daily_calorie_goal: f64 = prompt_number("Daily calorie goal (kcal)", "2000")?;
    let diseases = prompt_diseases()?;
    let allergies = prompt_list("Allergies (comma separated, Enter for none)")?;
    let dietary_preferences = prompt_list("Preferred ingredients (comma separated)")?;
    let disliked_ingredients = prompt_list("Disliked ingredients (comma separated)")?;
    let pregnancy_trimester = prompt_trimester()?;

    let profile = HealthProfile {
        diseases,
        allergies,
        age,
        daily_calorie_goal,
        dietary_preferences,
        disliked_ingredients,
        pregnancy_trimester,
    };
    profile.validate()?;
    Ok(profile)
}
