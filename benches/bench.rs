// Criterion benchmarks for Tutoreal Match

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use tutoreal_match::core::{calculate_match_score, rank_tutors, TutorMatcher};
use tutoreal_match::models::{MatchQuery, StudentPreferences, TeachingStyle, TutorCandidate, WeightConfig};
use tutoreal_match::services::InMemoryCatalog;

const STYLES: [TeachingStyle; 3] = [TeachingStyle::Visual, TeachingStyle::Auditory, TeachingStyle::ReadWrite];

fn create_tutor(id: usize) -> TutorCandidate {
    TutorCandidate {
        tutor_id: id as i64,
        name: format!("Tutor {}", id),
        profile_pic_url: None,
        average_rating: if id % 7 == 0 { None } else { Some(1.0 + (id % 40) as f64 / 10.0) },
        price: 20.0 + (id % 60) as f64,
        preferred_language: if id % 3 == 0 { "Spanish" } else { "English" }.to_string(),
        teaching_style: STYLES[id % 3],
    }
}

fn desired_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap_or_default()
}

fn create_preferences() -> StudentPreferences {
    StudentPreferences {
        budget: 50.0,
        preferred_language: "English".to_string(),
        learning_style: TeachingStyle::Visual,
        desired_date: desired_date(),
    }
}

/// Catalog with a prerequisite chain of `depth` subjects, each taught by `tutors` tutors
fn create_catalog(depth: usize, tutors: usize) -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();
    for level in 0..depth {
        let subject = format!("Subject {}", level);
        let prerequisite = (level > 0).then(|| format!("Subject {}", level - 1));
        catalog.add_subject(&subject, prerequisite.as_deref());

        for i in 0..tutors {
            let id = level * tutors + i;
            catalog.add_offering(&subject, create_tutor(id));
            if id % 2 == 0 {
                catalog.add_slot(id as i64, desired_date());
            }
        }
    }
    catalog
}

fn bench_scoring(c: &mut Criterion) {
    let tutor = create_tutor(1);
    let weights = WeightConfig::default();

    c.bench_function("calculate_match_score", |b| {
        b.iter(|| {
            calculate_match_score(
                black_box(&tutor),
                black_box(true),
                black_box(50.0),
                black_box("English"),
                black_box(TeachingStyle::Visual),
                black_box(&weights),
            )
        });
    });
}

fn bench_ranking(c: &mut Criterion) {
    let preferences = create_preferences();
    let weights = WeightConfig::default();

    let mut group = c.benchmark_group("ranking");

    for tutor_count in [10, 100, 1000].iter() {
        let tutors: Vec<(TutorCandidate, bool)> = (0..*tutor_count)
            .map(|i| (create_tutor(i), i % 2 == 0))
            .collect();

        group.bench_with_input(BenchmarkId::new("rank_tutors", tutor_count), tutor_count, |b, _| {
            b.iter(|| rank_tutors(black_box(tutors.clone()), black_box(&preferences), black_box(&weights)));
        });
    }

    group.finish();
}

fn bench_matching(c: &mut Criterion) {
    let weights = WeightConfig::default();

    let mut group = c.benchmark_group("matching");

    for depth in [1, 5, 20].iter() {
        let matcher = TutorMatcher::from_catalog(Arc::new(create_catalog(*depth, 50)));
        let query = MatchQuery {
            subject: format!("Subject {}", depth - 1),
            desired_date: "15-06-2025".to_string(),
            budget: 50.0,
            language: "English".to_string(),
            learning_style: TeachingStyle::Visual,
        };

        group.bench_with_input(BenchmarkId::new("find_match_chain_depth", depth), depth, |b, _| {
            b.iter(|| tokio_test::block_on(matcher.find_match(black_box(&query), black_box(&weights))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scoring, bench_ranking, bench_matching);

criterion_main!(benches);
