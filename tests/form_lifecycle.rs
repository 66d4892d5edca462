//! End-to-end exercises of the drafting form: seeding, the four input
//! modalities, the recording round-trip, and preview — all against mock
//! audio and a mock transcription gateway.

use vdraft::audio::recorder::MockAudioSource;
use vdraft::catalog::DocumentSchema;
use vdraft::form::session::RecorderState;
use vdraft::form::{DraftForm, ViewMode};
use vdraft::gateway::MockTranscriptionGateway;
use vdraft::richtext::{MarkdownEngine, RichTextBuffer};
use vdraft::VdraftError;

fn affidavit_schema() -> DocumentSchema {
    serde_json::from_str(
        r#"{
            "fieldName": "Affidavit",
            "field1": [
                {"NameOfField": "Intro", "ExampleContent": ""},
                {"NameOfField": "Statement of Facts", "ExampleContent": "The facts."},
                {"NameOfField": "Closing", "ExampleContent": ""}
            ]
        }"#,
    )
    .expect("schema fixture parses")
}

fn mount(source: MockAudioSource) -> DraftForm {
    DraftForm::new(
        &affidavit_schema(),
        Box::new(source),
        Box::new(MarkdownEngine::new()),
        16000,
    )
    .expect("form mounts")
}

#[test]
fn seeding_preserves_schema_order() {
    let form = mount(MockAudioSource::new());

    assert_eq!(form.title(), "Affidavit");
    let names: Vec<&str> = form.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Intro", "Statement of Facts", "Closing"]);
    assert_eq!(form.fields()[1].content, "The facts.");
}

#[test]
fn missing_form_data_reports_instead_of_crashing() {
    let no_fields: DocumentSchema =
        serde_json::from_str(r#"{"fieldName": "Affidavit"}"#).expect("parses");

    let result = DraftForm::new(
        &no_fields,
        Box::new(MockAudioSource::new()),
        Box::new(MarkdownEngine::new()),
        16000,
    );

    match result {
        Err(VdraftError::DataShape { message }) => {
            assert!(message.contains("no form data available"));
        }
        _ => panic!("expected DataShape error"),
    }
}

#[tokio::test]
async fn dictation_round_trip_fills_the_target_field() {
    let mut form = mount(MockAudioSource::new().with_samples(vec![42i16; 1600]));
    let gateway = MockTranscriptionGateway::new()
        .with_response("I solemnly affirm the following.");

    assert!(form.start_recording(0));
    assert_eq!(form.recorder_state(), RecorderState::Recording { field: 0 });

    form.poll_audio();
    assert!(form.stop_recording(&gateway).await);

    assert_eq!(form.fields()[0].content, "I solemnly affirm the following.");
    assert_eq!(form.fields()[1].content, "The facts.");
    assert!(form.recorder_state().is_idle());
    assert_eq!(gateway.requested_fields(), vec!["INTRO"]);
}

#[tokio::test]
async fn inserts_during_processing_do_not_redirect_the_commit() {
    let mut form = mount(MockAudioSource::new().with_samples(vec![1i16; 160]));
    let gateway = MockTranscriptionGateway::new().with_response("captured for slot two");

    assert!(form.start_recording(2));
    // The collection grows above the target while the capture is live.
    form.insert_field_after(0);
    form.insert_field_after(0);
    assert_eq!(form.fields().len(), 5);

    assert!(form.stop_recording(&gateway).await);

    // The commit lands on index 2 — captured at start time — which now
    // holds an inserted placeholder, not on the field named "Closing".
    assert_eq!(form.fields()[2].content, "captured for slot two");
    assert_eq!(form.fields()[4].name, "Closing");
    assert_eq!(form.fields()[4].content, "");
}

#[tokio::test]
async fn permission_denied_surfaces_and_leaves_no_trace() {
    let mut form = mount(
        MockAudioSource::new()
            .with_permission_denied()
            .with_error_message("portal refused the microphone"),
    );
    let gateway = MockTranscriptionGateway::new();

    assert!(!form.start_recording(0));

    assert!(form.recorder_state().is_idle());
    assert_eq!(form.fields()[0].content, "");
    let banner = form.error().expect("banner expected");
    assert!(!banner.is_empty());

    // And a stop after the failed start is still a no-op.
    assert!(!form.stop_recording(&gateway).await);
    assert!(gateway.requested_fields().is_empty());
}

#[tokio::test]
async fn gateway_failure_keeps_field_and_recovers() {
    let mut form = mount(MockAudioSource::new().with_samples(vec![1i16; 160]));

    form.set_field_content(0, "typed before dictating");
    let failing = MockTranscriptionGateway::new().with_network_failure();
    assert!(form.start_recording(0));
    assert!(!form.stop_recording(&failing).await);

    assert_eq!(form.fields()[0].content, "typed before dictating");
    assert_eq!(
        form.error().expect("banner"),
        "No response received from server. Please try again."
    );

    // The session fully recovered: a retry succeeds.
    let working = MockTranscriptionGateway::new().with_response("second attempt");
    assert!(form.start_recording(0));
    assert!(form.error().is_none());
    assert!(form.stop_recording(&working).await);
    assert_eq!(form.fields()[0].content, "second attempt");
}

#[test]
fn editor_cancel_is_lossless_and_save_is_exact() {
    let mut form = mount(MockAudioSource::new());
    form.set_field_content(0, "original\ncontent");

    // Cancel: field byte-identical regardless of buffer mangling.
    form.open_editor(0).expect("opens");
    form.editor_buffer_mut().expect("buffer").replace_text("all new");
    form.cancel_editor();
    assert_eq!(form.fields()[0].content, "original\ncontent");

    // Save: exactly the serialized draft, no other field touched.
    form.open_editor(0).expect("reopens");
    form.editor_buffer_mut().expect("buffer").replace_text("# Sworn Statement");
    form.editor_buffer_mut()
        .expect("buffer")
        .append_line("Signed in person.");
    assert!(form.save_editor());

    assert_eq!(form.fields()[0].content, "# Sworn Statement\n\nSigned in person.");
    assert_eq!(form.fields()[1].content, "The facts.");
}

#[test]
fn second_open_requires_explicit_close() {
    let mut form = mount(MockAudioSource::new());

    form.open_editor(1).expect("opens");
    match form.open_editor(0) {
        Err(VdraftError::EditorOpen { index }) => assert_eq!(index, 1),
        _ => panic!("expected EditorOpen"),
    }
}

#[test]
fn preview_toggle_round_trip_leaves_fields_unchanged() {
    let mut form = mount(MockAudioSource::new());
    form.set_field_content(0, "**bold** claim");
    let before: Vec<_> = form.fields().to_vec();

    assert_eq!(form.toggle_preview(), ViewMode::Preview);
    let preview = form.preview().expect("snapshot");
    assert_eq!(preview.title, "Affidavit");
    assert!(preview.sections[0].html.contains("<strong>bold</strong>"));

    assert_eq!(form.toggle_preview(), ViewMode::Edit);
    assert_eq!(form.fields(), before.as_slice());
    assert!(form.preview().is_none());
}

#[test]
fn preview_escapes_injected_html() {
    let mut form = mount(MockAudioSource::new());
    form.set_field_content(0, "<script>steal()</script> honest text");

    form.toggle_preview();

    let html = &form.preview().expect("snapshot").sections[0].html;
    assert!(!html.contains("<script>"));
    assert!(html.contains("honest text"));
}

#[tokio::test]
async fn full_drafting_session() {
    // The worked scenario: type, dictate, insert, rich-text edit, preview.
    let mut form = mount(MockAudioSource::new().with_samples(vec![9i16; 320]));
    let gateway = MockTranscriptionGateway::new().with_response("dictated closing");

    form.set_field_content(0, "Typed intro.");

    assert!(form.start_recording(2));
    form.poll_audio();
    assert!(form.stop_recording(&gateway).await);

    let added = form.insert_field_after(1).expect("inserts");
    form.set_field_content(added, "Inserted remark.");

    form.open_editor(1).expect("opens");
    form.editor_buffer_mut().expect("buffer").append_line("Amended fact.");
    assert!(form.save_editor());

    form.toggle_preview();
    let html = form.preview().expect("snapshot").to_html();

    assert!(html.contains("<h1>Affidavit</h1>"));
    assert!(html.contains("Typed intro."));
    assert!(html.contains("Amended fact."));
    assert!(html.contains("Inserted remark."));
    assert!(html.contains("dictated closing"));
}
