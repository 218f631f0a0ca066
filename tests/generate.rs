//! API Generation Integration Tests
//!
//! Builds small content trees on disk and checks the generated JSON output:
//! index projections, per-entity files and by-parent grouping files.

use std::path::Path;

use coursegen::ApiGenerator;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::fs;

async fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).await.unwrap();
    fs::write(path, content).await.unwrap();
}

async fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path).await.unwrap();
    serde_json::from_str(&text).unwrap()
}

/// Two themes, one topic under algebra, one exercise and one video under the
/// topic. The exercise has no solution.md and the video has no transcript.md.
async fn sample_tree(content: &Path) {
    write_file(
        &content.join("themes/algebra/metadata.md"),
        "---\n\
         id: theme-algebra\n\
         title: \"Algebra\"\n\
         slug: algebra\n\
         cardDescription: \"Equations and more\"\n\
         category: math\n\
         sequence: 1\n\
         image: /img/algebra.png\n\
         difficulty: beginner\n\
         duration: 4h\n\
         ---\n",
    )
    .await;
    write_file(
        &content.join("themes/algebra/description.md"),
        "---\nauthor: staff\n---\nAlgebra is the study of symbols.\n",
    )
    .await;

    write_file(
        &content.join("themes/geometry/metadata.md"),
        "---\nid: theme-geometry\ntitle: \"Geometry\"\nslug: geometry\nsequence: 2\n---\n",
    )
    .await;

    write_file(
        &content.join("topics/algebra/linear-equations/metadata.md"),
        "---\n\
         id: topic-linear\n\
         title: \"Linear Equations\"\n\
         slug: linear-equations\n\
         cardDescription: \"One unknown at a time\"\n\
         theme: algebra\n\
         sequence: 1\n\
         difficulty: beginner\n\
         duration: 45min\n\
         ---\n",
    )
    .await;
    write_file(
        &content.join("topics/algebra/linear-equations/content.md"),
        "---\nformat: markdown\n---\nSolving ax + b = 0.\n",
    )
    .await;

    write_file(
        &content.join("exercises/algebra/linear-equations/solve-for-x/metadata.md"),
        "---\n\
         id: exercise-solve\n\
         title: \"Solve for x\"\n\
         slug: solve-for-x\n\
         cardDescription: \"Isolate the unknown\"\n\
         theme: algebra\n\
         topic: linear-equations\n\
         difficulty: easy\n\
         estimated_time: 10\n\
         points: 25\n\
         tags: [linear, basics]\n\
         ---\n",
    )
    .await;
    // No frontmatter: the whole file is the body, untrimmed
    write_file(
        &content.join("exercises/algebra/linear-equations/solve-for-x/instructions.md"),
        "Solve 2x + 4 = 0.\n",
    )
    .await;

    write_file(
        &content.join("videos/algebra/linear-equations/intro-video/metadata.md"),
        "---\n\
         id: video-intro\n\
         title: \"Linear Equations Intro\"\n\
         slug: intro-video\n\
         cardDescription: \"Watch first\"\n\
         theme: algebra\n\
         topic: linear-equations\n\
         duration: 300\n\
         video_url: \"https://example.com/v/1\"\n\
         thumbnail: /img/v1.png\n\
         difficulty: easy\n\
         tags: [intro]\n\
         ---\n",
    )
    .await;
}

async fn generate(temp: &TempDir) -> std::path::PathBuf {
    let content = temp.path().join("content");
    let api = temp.path().join("api");
    sample_tree(&content).await;

    ApiGenerator::new(&content, &api).generate().await.unwrap();
    api
}

#[tokio::test]
async fn test_index_uses_display_field_whitelist() {
    let temp = TempDir::new().unwrap();
    let api = generate(&temp).await;

    let index = read_json(&api.join("themes/index.json")).await;
    let entries = index.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    let algebra = entries
        .iter()
        .find(|e| e["id"] == json!("theme-algebra"))
        .unwrap();
    assert_eq!(algebra["title"], json!("Algebra"));
    assert_eq!(algebra["sequence"], json!(1));
    assert_eq!(algebra["duration"], json!("4h"));

    // Non-display fields stay out of the index
    assert!(algebra.get("description").is_none());
    assert!(algebra.get("folder").is_none());
    assert!(algebra.get("type").is_none());

    // Fields absent from the record are omitted, not emitted as null
    let geometry = entries
        .iter()
        .find(|e| e["id"] == json!("theme-geometry"))
        .unwrap();
    assert!(geometry.get("cardDescription").is_none());
}

#[tokio::test]
async fn test_entity_file_holds_full_record() {
    let temp = TempDir::new().unwrap();
    let api = generate(&temp).await;

    let theme = read_json(&api.join("themes/theme-algebra.json")).await;
    assert_eq!(
        theme,
        json!({
            "id": "theme-algebra",
            "title": "Algebra",
            "slug": "algebra",
            "cardDescription": "Equations and more",
            "category": "math",
            "sequence": 1,
            "image": "/img/algebra.png",
            "difficulty": "beginner",
            "duration": "4h",
            "description": "Algebra is the study of symbols.",
            "folder": "algebra",
            "type": "theme"
        })
    );
}

#[tokio::test]
async fn test_absent_auxiliary_files_become_empty_strings() {
    let temp = TempDir::new().unwrap();
    let api = generate(&temp).await;

    let exercise = read_json(&api.join("exercises/exercise-solve.json")).await;
    assert_eq!(exercise["instructions"], json!("Solve 2x + 4 = 0.\n"));
    assert_eq!(exercise["solution"], json!(""));
    assert_eq!(exercise["points"], json!(25));
    assert_eq!(exercise["tags"], json!(["linear", "basics"]));
    assert_eq!(exercise["exerciseFolder"], json!("solve-for-x"));

    let video = read_json(&api.join("videos/video-intro.json")).await;
    assert_eq!(video["transcript"], json!(""));
    assert_eq!(video["video_url"], json!("https://example.com/v/1"));
    assert_eq!(video["themeFolder"], json!("algebra"));
    assert_eq!(video["topicFolder"], json!("linear-equations"));
    assert_eq!(video["videoFolder"], json!("intro-video"));
}

#[tokio::test]
async fn test_grouping_resolves_parent_slug_to_id() {
    let temp = TempDir::new().unwrap();
    let api = generate(&temp).await;

    let by_theme = read_json(&api.join("topics/by-theme/theme-algebra.json")).await;
    let topics = by_theme.as_array().unwrap();
    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0]["id"], json!("topic-linear"));
    // Parent reference is redundant inside a by-parent file
    assert!(topics[0].get("theme").is_none());

    // The geometry theme has no topics, so no grouping file
    assert!(!api.join("topics/by-theme/theme-geometry.json").exists());

    let by_topic = read_json(&api.join("exercises/by-topic/topic-linear.json")).await;
    let exercises = by_topic.as_array().unwrap();
    assert_eq!(exercises.len(), 1);
    assert_eq!(exercises[0]["id"], json!("exercise-solve"));
    assert!(exercises[0].get("theme").is_none());
    assert!(exercises[0].get("topic").is_none());

    let by_topic = read_json(&api.join("videos/by-topic/topic-linear.json")).await;
    assert_eq!(by_topic.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unresolved_parent_slug_is_dropped_from_groupings() {
    let temp = TempDir::new().unwrap();
    let content = temp.path().join("content");
    let api = temp.path().join("api");
    sample_tree(&content).await;

    // Topic referencing a theme slug that is not loaded
    write_file(
        &content.join("topics/calculus/limits/metadata.md"),
        "---\nid: topic-limits\ntitle: \"Limits\"\nslug: limits\ntheme: calculus\n---\n",
    )
    .await;

    ApiGenerator::new(&content, &api).generate().await.unwrap();

    // Still indexed and written as an entity, just absent from groupings
    let index = read_json(&api.join("topics/index.json")).await;
    assert_eq!(index.as_array().unwrap().len(), 2);
    assert!(api.join("topics/topic-limits.json").exists());

    let mut grouping_files = fs::read_dir(api.join("topics/by-theme")).await.unwrap();
    let mut names = Vec::new();
    while let Some(entry) = grouping_files.next_entry().await.unwrap() {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    assert_eq!(names, vec!["theme-algebra.json"]);
}

#[tokio::test]
async fn test_child_without_parent_reference_is_dropped_from_groupings() {
    let temp = TempDir::new().unwrap();
    let content = temp.path().join("content");
    let api = temp.path().join("api");
    sample_tree(&content).await;

    // Exercise with no topic field at all
    write_file(
        &content.join("exercises/algebra/linear-equations/orphan/metadata.md"),
        "---\nid: exercise-orphan\ntitle: \"Orphan\"\nslug: orphan\n---\n",
    )
    .await;

    ApiGenerator::new(&content, &api).generate().await.unwrap();

    // Indexed and written as an entity, but absent from every grouping file
    assert!(api.join("exercises/exercise-orphan.json").exists());
    let index = read_json(&api.join("exercises/index.json")).await;
    assert_eq!(index.as_array().unwrap().len(), 2);

    let by_topic = read_json(&api.join("exercises/by-topic/topic-linear.json")).await;
    let ids: Vec<&str> = by_topic
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["exercise-solve"]);
}

#[tokio::test]
async fn test_leaves_without_metadata_or_id_are_skipped() {
    let temp = TempDir::new().unwrap();
    let content = temp.path().join("content");
    let api = temp.path().join("api");
    sample_tree(&content).await;

    // Leaf directory without metadata.md
    fs::create_dir_all(content.join("themes/drafts"))
        .await
        .unwrap();
    // Stray file at a folder level
    write_file(&content.join("themes/notes.txt"), "not a theme\n").await;
    // Metadata without an id
    write_file(
        &content.join("themes/anonymous/metadata.md"),
        "---\ntitle: \"No Id Yet\"\nslug: no-id\n---\n",
    )
    .await;

    ApiGenerator::new(&content, &api).generate().await.unwrap();

    let index = read_json(&api.join("themes/index.json")).await;
    assert_eq!(index.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_empty_categories_still_get_index_files() {
    let temp = TempDir::new().unwrap();
    let content = temp.path().join("content");
    let api = temp.path().join("api");
    fs::create_dir_all(&content).await.unwrap();

    ApiGenerator::new(&content, &api).generate().await.unwrap();

    for category in ["themes", "topics", "exercises", "videos"] {
        let index = read_json(&api.join(category).join("index.json")).await;
        assert_eq!(index, json!([]));
    }
}

#[tokio::test]
async fn test_missing_content_root_is_an_error() {
    let temp = TempDir::new().unwrap();
    let result = ApiGenerator::new(temp.path().join("missing"), temp.path().join("api"))
        .generate()
        .await;

    let err = result.unwrap_err().to_string();
    assert!(err.contains("content directory not found"), "{}", err);
}
