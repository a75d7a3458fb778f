// src/seed.rs

//! Demo content for a fresh database.

use thiserror::Error;
use validator::Validate;

use crate::{
    models::{
        chapter::{Chapter, TopicRef},
        exam::{Exam, NewExam},
        id::ObjectId,
        previous_year::{PaperQuestion, PreviousYearPaper},
        subject::Subject,
        topic::{DescriptionEntry, DescriptionNode, NewTopic, Table},
    },
    store::{ContentStore, StoreError},
    utils::slug::slugify,
};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("invalid seed document: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Inserts the demo exams, subjects, chapters, topics and papers.
///
/// Does nothing when any exam already exists. Returns whether content was written.
pub async fn seed_demo_content(store: &dyn ContentStore) -> Result<bool, SeedError> {
    if store.count_exams().await? > 0 {
        tracing::info!("Exams already present, skipping demo seed");
        return Ok(false);
    }

    tracing::info!("Seeding demo content into {} store", store.backend_tag());

    let upsc = exam(
        "UPSC",
        "Union Public Service Commission examination",
        "2025-06-01",
        &["History", "Geography", "Polity", "Economics"],
    )?;
    let jee = exam(
        "JEE",
        "Joint Entrance Examination for engineering admissions",
        "2025-04-02",
        &["Physics", "Chemistry", "Mathematics"],
    )?;
    let neet = exam(
        "NEET",
        "National Eligibility cum Entrance Test for medical admissions",
        "2025-05-04",
        &["Physics", "Chemistry", "Biology"],
    )?;

    for e in [&upsc, &jee, &neet] {
        store.insert_exam(e.clone()).await?;
    }

    // Physics and Chemistry are shared between JEE and NEET.
    let mut subjects = Vec::new();
    for name in &upsc.subjects {
        subjects.push(subject(name, &[&upsc]));
    }
    let physics = subject("Physics", &[&jee, &neet]);
    let chemistry = subject("Chemistry", &[&jee, &neet]);
    subjects.push(physics.clone());
    subjects.push(chemistry);
    subjects.push(subject("Mathematics", &[&jee]));
    subjects.push(subject("Biology", &[&neet]));

    for s in subjects {
        store.insert_subject(s).await?;
    }

    let projectile = projectile_motion_topic()?;
    let kinematics = Chapter {
        id: ObjectId::new(),
        name: "Kinematics".to_string(),
        topics: vec![
            TopicRef::Name("Displacement and Velocity".to_string()),
            TopicRef::Linked {
                name: projectile.title.clone(),
                slug: projectile.slug.clone(),
            },
            TopicRef::Name("Relative Motion".to_string()),
        ],
        subject_ids: vec![physics.id],
    };
    let laws = Chapter {
        id: ObjectId::new(),
        name: "Laws of Motion".to_string(),
        topics: vec![linked("Newton's Laws of Motion"), linked("Friction")],
        subject_ids: vec![physics.id],
    };

    store.insert_topic(projectile).await?;
    store.insert_chapter(kinematics).await?;
    store.insert_chapter(laws).await?;

    let paper = PreviousYearPaper {
        id: ObjectId::new(),
        exam_ids: vec![jee.id],
        subject_ids: vec![physics.id],
        year: 2023,
        questions: vec![PaperQuestion {
            question: "A ball is projected at 45° with speed 20 m/s. Its range is (g = 10 m/s²):"
                .to_string(),
            options: vec!["20 m".into(), "40 m".into(), "10 m".into(), "80 m".into()],
            answer: "40 m".to_string(),
        }],
    };
    for question in &paper.questions {
        question.validate()?;
    }
    store.insert_previous_year(paper).await?;

    tracing::info!("Demo content seeded");
    Ok(true)
}

fn exam(name: &str, description: &str, date: &str, subjects: &[&str]) -> Result<Exam, SeedError> {
    let new = NewExam {
        name: name.to_string(),
        description: Some(description.to_string()),
        upcoming_date: Some(date.to_string()),
        subjects: subjects.iter().map(|s| s.to_string()).collect(),
    };
    new.validate()?;
    Ok(new.into_exam(ObjectId::new()))
}

fn subject(name: &str, exams: &[&Exam]) -> Subject {
    Subject {
        id: ObjectId::new(),
        name: name.to_string(),
        exam_ids: exams.iter().map(|e| e.id).collect(),
    }
}

fn linked(name: &str) -> TopicRef {
    TopicRef::Linked {
        name: name.to_string(),
        slug: slugify(name),
    }
}

fn projectile_motion_topic() -> Result<crate::models::topic::Topic, SeedError> {
    let new = NewTopic {
        slug: "projectile-motion".to_string(),
        title: "Projectile Motion".to_string(),
        exam: "JEE".to_string(),
        description: vec![
            DescriptionNode::Text(
                "A projectile moves under gravity alone after launch.".to_string(),
            ),
            DescriptionNode::Entry(DescriptionEntry {
                point: Some("Range".to_string()),
                expression: Some("R = u² sin 2θ / g".to_string()),
                example: Some("u = 20 m/s, θ = 45° gives R = 40 m".to_string()),
                details: vec![DescriptionNode::Entry(DescriptionEntry {
                    point: Some("Maximum range".to_string()),
                    details: vec![DescriptionNode::Text(
                        "Occurs at θ = 45°.".to_string(),
                    )],
                    ..Default::default()
                })],
                properties: vec![DescriptionNode::Text(
                    "Complementary angles give equal ranges.".to_string(),
                )],
                tables: vec![Table {
                    caption: Some("Symbols".to_string()),
                    headers: vec!["Symbol".into(), "Meaning".into()],
                    rows: vec![
                        vec!["u".into(), "launch speed".into()],
                        vec!["θ".into(), "launch angle".into()],
                    ],
                }],
            }),
        ],
    };
    new.validate()?;
    Ok(new.into_topic(ObjectId::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn seeds_once() {
        let store = MemoryStore::new();
        assert!(seed_demo_content(&store).await.unwrap());
        assert!(!seed_demo_content(&store).await.unwrap());
        assert_eq!(store.count_exams().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn shared_subjects_are_visible_under_both_exams() {
        use crate::store::Lookup;

        let store = MemoryStore::new();
        seed_demo_content(&store).await.unwrap();

        let jee = store
            .find_exam(&Lookup::Name("JEE".into()))
            .await
            .unwrap()
            .unwrap();
        let neet = store
            .find_exam(&Lookup::Name("NEET".into()))
            .await
            .unwrap()
            .unwrap();
        let physics = Lookup::Name("Physics".into());

        let a = store.find_subject(&jee.id, &physics).await.unwrap().unwrap();
        let b = store.find_subject(&neet.id, &physics).await.unwrap().unwrap();
        assert_eq!(a.id, b.id);
    }
}
