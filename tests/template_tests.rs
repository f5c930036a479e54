use std::fs;

use contact_form_backend::{
    errors::TemplateError,
    templates::{
        renderer::{render, TemplateValues},
        store::{FsTemplateStore, TemplateStore, CONFIRMATION, OWNER_NOTIFICATION},
    },
};

fn values() -> TemplateValues {
    TemplateValues::new("Jo", "j@x.com", "Web", "line1\nline2")
}

#[test]
fn substitutes_placeholders_and_breaks_lines() {
    let out = render("Hi $name, re $project: $message", &values());

    assert_eq!(out, "Hi Jo, re Web: line1<br>line2");
}

#[test]
fn replaces_every_occurrence() {
    let out = render("$name/$name <$email> $email", &values());

    assert_eq!(out, "Jo/Jo <j@x.com> j@x.com");
}

#[test]
fn rendering_is_repeatable() {
    let template = "<p>$name</p><p>$message</p>";

    assert_eq!(render(template, &values()), render(template, &values()));
}

#[test]
fn leaves_unknown_dollars_alone() {
    let out = render("Price: $5, $unknown, $name", &values());

    assert_eq!(out, "Price: $5, $unknown, Jo");
}

#[test]
fn submitted_values_are_not_rescanned() {
    let sneaky = TemplateValues::new("$email", "j@x.com", "Web", "M");

    assert_eq!(render("Hello $name", &sneaky), "Hello $email");
}

#[test]
fn html_in_values_is_inserted_raw() {
    let html = TemplateValues::new("<b>Jo</b>", "j@x.com", "Web", "<script>x</script>");

    assert_eq!(
        render("$name: $message", &html),
        "<b>Jo</b>: <script>x</script>"
    );
}

#[tokio::test]
async fn embedded_store_serves_both_templates() {
    let store = FsTemplateStore::embedded();

    let notification = store.load(OWNER_NOTIFICATION).await.unwrap();
    let confirmation = store.load(CONFIRMATION).await.unwrap();

    assert!(notification.contains("New Contact Form Submission"));
    assert!(notification.contains("$message"));
    assert!(confirmation.contains("Hello $name"));
}

#[tokio::test]
async fn embedded_store_rejects_unknown_names() {
    let store = FsTemplateStore::embedded();

    assert!(matches!(
        store.load("newsletter").await,
        Err(TemplateError::NotFound(_))
    ));
}

#[tokio::test]
async fn directory_store_reads_html_files() {
    let dir = std::env::temp_dir().join(format!("contact-form-templates-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("confirmation.html"), "<p>Thanks $name</p>").unwrap();

    let store = FsTemplateStore::from_dir(&dir);

    assert_eq!(store.load(CONFIRMATION).await.unwrap(), "<p>Thanks $name</p>");
    assert!(matches!(
        store.load(OWNER_NOTIFICATION).await,
        Err(TemplateError::NotFound(_))
    ));

    fs::remove_dir_all(&dir).unwrap();
}
