//! One-time seed loader for a freshly created lab store.
//!
//! # Responsibility
//! - Insert the fixed starter dataset (4 subjects, 8 labs).
//! - Record a `seed_version` marker so re-opening never re-inserts.
//!
//! # Invariants
//! - All inserts and the marker write commit in one transaction, or none do.
//! - A store carrying the marker is never touched by this module again.

use crate::model::lab::{Lab, LabStatus};
use crate::model::subject::Subject;
use crate::repo::lab_repo::{LabRepository, SqliteLabRepository};
use crate::repo::subject_repo::{SqliteSubjectRepository, SubjectRepository};
use crate::repo::RepoResult;
use log::{error, info};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use std::time::Instant;

const SEED_MARKER_KEY: &str = "seed_version";
const SEED_VERSION: &str = "1";

/// Result of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { subjects: usize, labs: usize },
    AlreadySeeded,
}

/// Starter subjects, in id order.
pub fn seed_subjects() -> Vec<Subject> {
    vec![
        Subject::new(1, "Основи штучного інтелекту"),
        Subject::new(2, "Хмарні технології та сервіси"),
        Subject::new(3, "Кібербезпека і захист даних"),
        Subject::new(4, "Розробка веб-додатків"),
    ]
}

/// Starter labs, two per subject, in id order.
pub fn seed_labs() -> Vec<Lab> {
    vec![
        Lab::new(
            1,
            1,
            "Вступ до машинного навчання",
            "Вивчити основи машинного навчання та побудувати першу модель класифікації.",
        )
        .with_comment("Дедлайн 10.01"),
        Lab::new(
            2,
            1,
            "Реалізація нейронної мережі",
            "Побудувати просту нейронну мережу для розпізнавання рукописних цифр.",
        )
        .with_comment("Захист у четвер")
        .with_status(LabStatus::Completed),
        Lab::new(
            3,
            2,
            "Налаштування хмарної інфраструктури",
            "Розгорнути сервер у хмарі AWS і налаштувати базовий стек веб-додатка.",
        )
        .with_status(LabStatus::Completed),
        Lab::new(
            4,
            2,
            "Контейнеризація з Docker",
            "Створити Docker-контейнер для розроблюваного веб-додатка.",
        )
        .with_comment("Тестування в п’ятницю")
        .with_status(LabStatus::InProgress),
        Lab::new(
            5,
            3,
            "Шифрування даних",
            "Реалізувати алгоритм шифрування AES для захисту файлів.",
        )
        .with_status(LabStatus::Completed),
        Lab::new(
            6,
            3,
            "Пошук вразливостей",
            "Сканувати сервер на вразливості за допомогою OWASP ZAP.",
        )
        .with_comment("Захист у понеділок")
        .with_status(LabStatus::Completed),
        Lab::new(
            7,
            4,
            "Розробка REST API",
            "Створити REST API для блогу з використанням Spring Boot.",
        )
        .with_comment("Протестувати ендпоінти")
        .with_status(LabStatus::Completed),
        Lab::new(
            8,
            4,
            "Інтеграція фронтенду та бекенду",
            "Інтегрувати фронтенд (React) із бекендом через API.",
        )
        .with_comment("Завершити до середи")
        .with_status(LabStatus::InProgress),
    ]
}

/// Seeds the store unless the marker says it already happened.
///
/// # Errors
/// - Returns the first failing insert; nothing from this call is persisted.
pub fn seed_if_needed(conn: &mut Connection) -> RepoResult<SeedOutcome> {
    let started_at = Instant::now();
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let marker: Option<String> = tx
        .query_row(
            "SELECT value FROM store_meta WHERE key = ?1;",
            [SEED_MARKER_KEY],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(version) = marker {
        info!("event=seed module=seed status=skipped seed_version={version}");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let outcome = insert_seed_rows(&tx);
    let (subjects, labs) = match outcome {
        Ok(counts) => counts,
        Err(err) => {
            error!(
                "event=seed module=seed status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err);
        }
    };

    tx.execute(
        "INSERT INTO store_meta (key, value) VALUES (?1, ?2);",
        [SEED_MARKER_KEY, SEED_VERSION],
    )?;
    tx.commit()?;

    info!(
        "event=seed module=seed status=ok subjects={subjects} labs={labs} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(SeedOutcome::Seeded { subjects, labs })
}

fn insert_seed_rows(conn: &Connection) -> RepoResult<(usize, usize)> {
    let subject_repo = SqliteSubjectRepository::try_new(conn)?;
    let lab_repo = SqliteLabRepository::try_new(conn)?;

    let subjects = seed_subjects();
    for subject in &subjects {
        subject_repo.create_subject(subject)?;
    }

    let labs = seed_labs();
    for lab in &labs {
        lab_repo.create_lab(lab)?;
    }

    Ok((subjects.len(), labs.len()))
}
