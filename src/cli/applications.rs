use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::Args;

use crate::models::deserializers::non_empty;
use crate::models::{Application, Status, timestamps, validate_date};
use crate::storage::{ApplicationStore, StoreError};
use crate::utils::{format_table, strip_ansi_codes, truncate};

/// Application fields shared by `add` and `update`
#[derive(Args, Debug, Default)]
pub struct ApplicationArgs {
    /// Company name
    #[arg(long)]
    pub company: Option<String>,
    /// Job title
    #[arg(long)]
    pub role: Option<String>,
    /// Status: applied, interviewing, rejected, offer [default: applied]
    #[arg(long)]
    pub status: Option<String>,
    /// Date applied in YYYY-MM-DD format [default: today]
    #[arg(long)]
    pub date: Option<String>,
    /// Job description URL
    #[arg(long)]
    pub jd_url: Option<String>,
    /// Job description text (inline)
    #[arg(long, conflicts_with = "jd_file")]
    pub jd_content: Option<String>,
    /// Path to a file containing the job description
    #[arg(long)]
    pub jd_file: Option<PathBuf>,
    /// Company website
    #[arg(long)]
    pub company_url: Option<String>,
    /// Path to the resume sent
    #[arg(long)]
    pub resume_path: Option<String>,
    /// Notes about the application
    #[arg(long)]
    pub notes: Option<String>,
}

/// Validated field changes, ready to apply without further I/O
#[derive(Debug, Default, PartialEq, Eq)]
struct ApplicationChanges {
    company: Option<String>,
    role: Option<String>,
    status: Option<Status>,
    date_applied: Option<String>,
    jd_url: Option<String>,
    jd_content: Option<String>,
    company_url: Option<String>,
    resume_path: Option<String>,
    notes: Option<String>,
}

impl ApplicationArgs {
    fn has_any_flag(&self) -> bool {
        [
            &self.company,
            &self.role,
            &self.status,
            &self.date,
            &self.jd_url,
            &self.jd_content,
            &self.company_url,
            &self.resume_path,
            &self.notes,
        ]
        .iter()
        .any(|flag| flag.as_deref().is_some_and(|v| !v.is_empty()))
            || self.jd_file.is_some()
    }

    /// Validate flag values and read the job description file if one was given.
    /// Empty flag values count as "not provided".
    fn into_changes(self) -> Result<ApplicationChanges> {
        let status = match self.status.and_then(non_empty) {
            Some(s) => Some(s.parse::<Status>()?),
            None => None,
        };

        let date_applied = self.date.and_then(non_empty);
        if let Some(date) = &date_applied {
            validate_date(date)?;
        }

        let jd_content = match &self.jd_file {
            Some(path) => {
                let content = fs::read_to_string(path).with_context(|| {
                    format!("Failed to read job description file: {}", path.display())
                })?;
                non_empty(content.trim())
            }
            None => self.jd_content.and_then(non_empty),
        };

        Ok(ApplicationChanges {
            company: self.company.and_then(non_empty),
            role: self.role.and_then(non_empty),
            status,
            date_applied,
            jd_url: self.jd_url.and_then(non_empty),
            jd_content,
            company_url: self.company_url.and_then(non_empty),
            resume_path: self.resume_path.and_then(non_empty),
            notes: self.notes.and_then(non_empty),
        })
    }
}

impl ApplicationChanges {
    fn apply(self, app: &mut Application) {
        if let Some(company) = self.company {
            app.company = company;
        }
        if let Some(role) = self.role {
            app.role = role;
        }
        if let Some(status) = self.status {
            app.status = status;
        }
        if let Some(date) = self.date_applied {
            app.date_applied = date;
        }
        if self.jd_url.is_some() {
            app.jd_url = self.jd_url;
        }
        if self.jd_content.is_some() {
            app.jd_content = self.jd_content;
        }
        if self.company_url.is_some() {
            app.company_url = self.company_url;
        }
        if self.resume_path.is_some() {
            app.resume_path = self.resume_path;
        }
        if self.notes.is_some() {
            app.notes = self.notes;
        }
    }
}

fn not_found(err: StoreError, id: &str) -> anyhow::Error {
    if err.is_not_found() { anyhow!("Application not found: {}", id) } else { err.into() }
}

fn print_summary(app: &Application) {
    println!("ID: {}", app.id);
    println!("Company: {}", strip_ansi_codes(&app.company));
    println!("Role: {}", strip_ansi_codes(&app.role));
    println!("Status: {}", strip_ansi_codes(app.status.as_str()));
    println!("Date Applied: {}", strip_ansi_codes(&app.date_applied));
}

pub fn add(store: &ApplicationStore, args: ApplicationArgs) -> Result<()> {
    let changes = args.into_changes()?;
    let (Some(company), Some(role)) = (changes.company.clone(), changes.role.clone()) else {
        bail!("--company and --role are required");
    };

    let mut app = Application::new(company, role);
    changes.apply(&mut app);
    app.validate()?;

    store.add(app.clone()).context("Failed to add application")?;

    println!("Application added successfully!");
    print_summary(&app);
    Ok(())
}

pub fn list(store: &ApplicationStore) -> Result<()> {
    let apps = store.load().context("Failed to load applications")?;

    if apps.is_empty() {
        println!("No applications found.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = apps
        .iter()
        .map(|app| {
            vec![
                app.id.clone(),
                truncate(&app.company, 20),
                truncate(&app.role, 25),
                strip_ansi_codes(app.status.as_str()),
                app.date_applied.clone(),
            ]
        })
        .collect();

    print!("{}", format_table(&["ID", "COMPANY", "ROLE", "STATUS", "DATE APPLIED"], &rows));
    println!();
    println!("Total: {} applications", apps.len());
    Ok(())
}

pub fn show(store: &ApplicationStore, id: &str) -> Result<()> {
    let app = store.get(id).map_err(|e| not_found(e, id))?;

    println!("ID:           {}", app.id);
    println!("Company:      {}", strip_ansi_codes(&app.company));
    println!("Role:         {}", strip_ansi_codes(&app.role));
    println!("Status:       {}", strip_ansi_codes(app.status.as_str()));
    println!("Date Applied: {}", strip_ansi_codes(&app.date_applied));

    let optional = [
        ("JD URL:      ", &app.jd_url),
        ("Company URL: ", &app.company_url),
        ("Resume Path: ", &app.resume_path),
        ("Notes:       ", &app.notes),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            println!("{} {}", label, strip_ansi_codes(value));
        }
    }

    println!("Created:      {}", timestamps::format(&app.created_at));
    println!("Updated:      {}", timestamps::format(&app.updated_at));

    if let Some(jd) = &app.jd_content {
        println!();
        println!("--- Job Description ---");
        println!("{}", strip_ansi_codes(jd));
    }
    Ok(())
}

pub fn update(store: &ApplicationStore, id: &str, args: ApplicationArgs) -> Result<()> {
    if !args.has_any_flag() {
        bail!("at least one field flag is required for update (see --help)");
    }
    let changes = args.into_changes()?;

    let app = store.update(id, |app| changes.apply(app)).map_err(|e| not_found(e, id))?;

    println!("Application updated successfully!");
    print_summary(&app);
    Ok(())
}

pub fn remove(store: &ApplicationStore, id: &str) -> Result<()> {
    store.remove(id).map_err(|e| not_found(e, id))?;
    println!("Application removed.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    fn args(company: &str, role: &str) -> ApplicationArgs {
        ApplicationArgs {
            company: Some(company.to_string()),
            role: Some(role.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_has_any_flag() {
        assert!(!ApplicationArgs::default().has_any_flag());
        assert!(!ApplicationArgs { notes: Some(String::new()), ..Default::default() }.has_any_flag());
        assert!(ApplicationArgs { notes: Some("x".into()), ..Default::default() }.has_any_flag());
        assert!(
            ApplicationArgs { jd_file: Some("jd.txt".into()), ..Default::default() }.has_any_flag()
        );
    }

    #[test]
    fn test_into_changes_rejects_bad_status() {
        let mut a = args("Acme", "Engineer");
        a.status = Some("hired".into());
        assert!(a.into_changes().is_err());
    }

    #[test]
    fn test_into_changes_rejects_bad_date() {
        let mut a = args("Acme", "Engineer");
        a.date = Some("2025/01/15".into());
        assert!(a.into_changes().is_err());
    }

    #[test]
    fn test_into_changes_reads_and_trims_jd_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "\n  Build great things.  \n").unwrap();

        let mut a = args("Acme", "Engineer");
        a.jd_file = Some(file.path().to_path_buf());
        let changes = a.into_changes().unwrap();
        assert_eq!(changes.jd_content.as_deref(), Some("Build great things."));
    }

    #[test]
    fn test_into_changes_missing_jd_file_is_error() {
        let mut a = args("Acme", "Engineer");
        a.jd_file = Some("/nonexistent/jd.txt".into());
        assert!(a.into_changes().is_err());
    }

    #[test]
    fn test_apply_only_touches_provided_fields() {
        let mut app = Application::new("Acme", "Engineer");
        app.notes = Some("keep me".into());

        let changes = ApplicationChanges {
            status: Some(Status::Offer),
            ..Default::default()
        };
        changes.apply(&mut app);

        assert_eq!(app.status, Status::Offer);
        assert_eq!(app.company, "Acme");
        assert_eq!(app.notes.as_deref(), Some("keep me"));
    }

    #[test]
    fn test_add_applies_status_and_date() {
        let dir = TempDir::new().unwrap();
        let store = ApplicationStore::in_dir(dir.path());

        let mut a = args("Old", "Dev");
        a.status = Some("interviewing".into());
        a.date = Some("2025-01-15".into());
        add(&store, a).unwrap();

        let apps = store.load().unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].status, Status::Interviewing);
        assert_eq!(apps[0].date_applied, "2025-01-15");
    }

    #[test]
    fn test_add_requires_company_and_role() {
        let dir = TempDir::new().unwrap();
        let store = ApplicationStore::in_dir(dir.path());

        let a = ApplicationArgs { company: Some("Acme".into()), ..Default::default() };
        assert!(add(&store, a).is_err());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_update_missing_id_reports_not_found() {
        let dir = TempDir::new().unwrap();
        let store = ApplicationStore::in_dir(dir.path());

        let a = ApplicationArgs { notes: Some("x".into()), ..Default::default() };
        let err = update(&store, "app-00000000", a).unwrap_err();
        assert_eq!(err.to_string(), "Application not found: app-00000000");
    }

    #[test]
    fn test_update_without_flags_is_error() {
        let dir = TempDir::new().unwrap();
        let store = ApplicationStore::in_dir(dir.path());
        let app = Application::new("Acme", "Engineer");
        store.add(app.clone()).unwrap();

        assert!(update(&store, &app.id, ApplicationArgs::default()).is_err());
    }
}
