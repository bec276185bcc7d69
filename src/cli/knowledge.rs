use anyhow::{Context, Result, anyhow, bail};
use clap::Args;

use crate::models::{KbBody, KbEntry, KbEntryType, ProfileCategory, ProfileData, RawKbBody};
use crate::storage::{KnowledgeStore, StoreError};
use crate::utils::{format_table, truncate};

/// Knowledge-base fields shared by `kb add` and `kb update`
#[derive(Args, Debug, Default)]
pub struct KbArgs {
    /// Entry type: profile or context (required for add)
    #[arg(long = "type", value_name = "TYPE")]
    pub entry_type: Option<String>,
    /// Category. Profile: contact, experience, education, skills, certifications, languages
    #[arg(long)]
    pub category: Option<String>,
    /// JSON payload for profile entries, e.g. '{"name":"John","email":"john@example.com"}'
    #[arg(long)]
    pub data: Option<String>,
    /// Text content for context entries
    #[arg(long)]
    pub content: Option<String>,
    /// Where the information came from, e.g. "cv-import", "user", or an application ID
    #[arg(long)]
    pub source: Option<String>,
}

impl KbArgs {
    fn has_any_flag(&self) -> bool {
        [&self.entry_type, &self.category, &self.data, &self.content, &self.source]
            .iter()
            .any(|flag| flag.as_deref().is_some_and(|v| !v.is_empty()))
    }
}

fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn not_found(err: StoreError, id: &str) -> anyhow::Error {
    if err.is_not_found() { anyhow!("Entry not found: {}", id) } else { err.into() }
}

/// One-line description of a profile entry for table output
///
/// Payloads that could not be read as their category are shown as raw JSON.
fn entry_summary(entry: &KbEntry) -> String {
    match &entry.body {
        KbBody::Profile(data) => summarize(data),
        KbBody::Unrecognized(RawKbBody { data: Some(value), .. }) => value.to_string(),
        _ => String::new(),
    }
}

/// One-line description of a profile payload
pub fn summarize(data: &ProfileData) -> String {
    match data {
        ProfileData::Contact(c) => format!("{} <{}>", c.name, c.email),
        ProfileData::Experience(e) => {
            format!("{} @ {} ({} - {})", e.role, e.company, e.start_date, e.end_date)
        }
        ProfileData::Education(e) => format!("{}, {}", e.degree, e.institution),
        ProfileData::Skills(s) => format!("{} skills across categories", s.count()),
        ProfileData::Certifications(c) => c.name.clone(),
        ProfileData::Languages(l) if l.proficiency.is_empty() => l.language.clone(),
        ProfileData::Languages(l) => format!("{} ({})", l.language, l.proficiency),
    }
}

pub fn show(store: &KnowledgeStore, filter: Option<&str>) -> Result<()> {
    let entries = match filter {
        None | Some("") => store.load(),
        Some("profile") => store.profile(),
        Some("context") => store.context(),
        Some(category) => store.by_category(category),
    }
    .context("Failed to load knowledge base")?;

    if entries.is_empty() {
        println!("No entries found.");
        return Ok(());
    }

    let (profile, context): (Vec<&KbEntry>, Vec<&KbEntry>) =
        entries.iter().partition(|e| e.entry_type() == Some(KbEntryType::Profile));

    if !profile.is_empty() {
        let rows: Vec<Vec<String>> = profile
            .iter()
            .map(|e| {
                let summary = entry_summary(e);
                vec![
                    e.id.clone(),
                    e.category().to_string(),
                    e.source.clone().unwrap_or_default(),
                    truncate(&summary, 50),
                ]
            })
            .collect();

        println!("=== Profile Entries ===");
        print!("{}", format_table(&["ID", "CATEGORY", "SOURCE", "SUMMARY"], &rows));
        println!();
        println!("Profile entries: {}", profile.len());
    }

    if !context.is_empty() {
        if !profile.is_empty() {
            println!();
        }
        let rows: Vec<Vec<String>> = context
            .iter()
            .map(|e| {
                vec![
                    e.id.clone(),
                    e.category().to_string(),
                    e.source.clone().unwrap_or_default(),
                    truncate(e.content().unwrap_or_default(), 50),
                ]
            })
            .collect();

        println!("=== Context Entries ===");
        print!("{}", format_table(&["ID", "CATEGORY", "SOURCE", "CONTENT"], &rows));
        println!();
        println!("Context entries: {}", context.len());
    }

    Ok(())
}

fn build_entry(args: &KbArgs) -> Result<KbEntry> {
    let entry_type: KbEntryType = provided(&args.entry_type)
        .ok_or_else(|| anyhow!("--type is required (profile or context)"))?
        .parse()?;
    let category = provided(&args.category).ok_or_else(|| anyhow!("--category is required"))?;
    let source = provided(&args.source).map(str::to_string);

    let entry = match entry_type {
        KbEntryType::Profile => {
            let category: ProfileCategory = category.parse()?;
            let json = provided(&args.data)
                .ok_or_else(|| anyhow!("--data is required for profile entries"))?;
            KbEntry::profile(ProfileData::parse(category, json)?, source)
        }
        KbEntryType::Context => {
            let content = provided(&args.content)
                .ok_or_else(|| anyhow!("--content is required for context entries"))?;
            KbEntry::context(category, content, source)
        }
    };

    entry.validate()?;
    Ok(entry)
}

pub fn add(store: &KnowledgeStore, args: KbArgs) -> Result<()> {
    let entry = build_entry(&args)?;
    store.add(entry.clone()).context("Failed to add entry")?;

    println!("Entry added successfully!");
    println!("ID: {}", entry.id);
    println!("Type: {}", entry.type_name());
    println!("Category: {}", entry.category());
    Ok(())
}

/// Work out the new body for `current` from the update flags
fn updated_body(current: &KbEntry, args: &KbArgs) -> Result<KbBody> {
    if let Some(requested) = provided(&args.entry_type)
        && Some(requested.parse::<KbEntryType>()?) != current.entry_type()
    {
        bail!("the type of an entry cannot be changed");
    }

    match &current.body {
        KbBody::Profile(data) => {
            if provided(&args.content).is_some() {
                bail!("--content applies to context entries only");
            }
            let category = match provided(&args.category) {
                Some(c) => c.parse::<ProfileCategory>()?,
                None => data.category(),
            };
            match provided(&args.data) {
                Some(json) => Ok(KbBody::Profile(ProfileData::parse(category, json)?)),
                None if category != data.category() => {
                    bail!("--data is required when changing the category of a profile entry")
                }
                None => Ok(current.body.clone()),
            }
        }
        KbBody::Context { category, content } => {
            if provided(&args.data).is_some() {
                bail!("--data applies to profile entries only");
            }
            Ok(KbBody::Context {
                category: provided(&args.category).unwrap_or(category).to_string(),
                content: provided(&args.content).unwrap_or(content).to_string(),
            })
        }
        KbBody::Unrecognized(raw) => {
            let mut raw = raw.clone();
            if let Some(category) = provided(&args.category) {
                raw.category = category.to_string();
            }
            if let Some(content) = provided(&args.content) {
                raw.content = Some(content.to_string());
            }
            match provided(&args.data) {
                Some(json) if raw.entry_type == KbEntryType::Profile.as_str() => {
                    let category: ProfileCategory = raw.category.parse()?;
                    Ok(KbBody::Profile(ProfileData::parse(category, json)?))
                }
                Some(_) => bail!("--data applies to profile entries only"),
                None => Ok(KbBody::from(raw)),
            }
        }
    }
}

pub fn update(store: &KnowledgeStore, id: &str, args: KbArgs) -> Result<()> {
    if !args.has_any_flag() {
        bail!("at least one flag is required for update (see --help)");
    }

    let current = store.get(id).map_err(|e| not_found(e, id))?;
    let mut candidate = current.clone();
    candidate.body = updated_body(&current, &args)?;
    if let Some(source) = provided(&args.source) {
        candidate.source = Some(source.to_string());
    }

    let KbEntry { body, source, .. } = candidate;
    let entry = store
        .update(id, |e| {
            e.body = body;
            e.source = source;
        })
        .map_err(|e| not_found(e, id))?;

    println!("Entry updated successfully!");
    println!("ID: {}", entry.id);
    println!("Type: {}", entry.type_name());
    println!("Category: {}", entry.category());
    Ok(())
}

pub fn remove(store: &KnowledgeStore, id: &str) -> Result<()> {
    store.remove(id).map_err(|e| not_found(e, id))?;
    println!("Entry removed.");
    Ok(())
}
