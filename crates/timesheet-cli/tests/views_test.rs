mod helpers;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use helpers::fixtures::{self, complete_entry, spreadsheet, MIB};
use helpers::{messages, notifications, FakeService, RecordingViewer};
use timesheet_cli::views::{dashboard, form, invoice};
use timesheet_cli::views::{
    AttachmentsView, DashboardView, FormView, InvoiceView, LoginView,
};
use timesheet_core::{
    AppError, AuthError, Credentials, FileCandidate, NotificationCenter, NotificationKind,
    StaticAuthenticator, TimesheetField, ValidationError,
};
use timesheet_uploads::{FixedStep, UploadManager, UploadPolicy};

const MAX_SIZE: u64 = 10 * 1024 * 1024;

fn fill_form(view: &mut FormView) {
    let entry = complete_entry();
    for field in TimesheetField::REQUIRED {
        view.set_field(field.wire_name(), &entry.get(field)).unwrap();
    }
}

fn invoice_view(
    service: &Arc<FakeService>,
    center: &NotificationCenter,
    dir: &Path,
    step: f64,
) -> InvoiceView {
    let uploads = UploadManager::new(UploadPolicy::invoice_source(MAX_SIZE), center.clone())
        .with_step_factory(move |_| Box::new(FixedStep(step)));
    InvoiceView::new(
        uploads,
        service.clone(),
        center.clone(),
        Arc::new(RecordingViewer::default()),
        dir.to_path_buf(),
    )
}

#[tokio::test]
async fn test_submit_valid_entry_sends_and_resets() {
    let service = FakeService::new();
    let center = notifications();
    let mut view = FormView::new(service.clone(), center.clone());
    fill_form(&mut view);
    assert_eq!(view.entry().get(TimesheetField::HoursWorked), "8.50");

    view.submit().await.unwrap();

    let submitted = service.submitted.lock().unwrap().clone();
    assert_eq!(submitted, vec![complete_entry()]);
    assert!(view.entry().is_empty());
    assert_eq!(view.entry().get(TimesheetField::HoursWorked), "0.00");
    assert!(!view.is_submitting());
    assert_eq!(
        messages(&center),
        vec![(NotificationKind::Success, form::SUBMIT_SUCCESS.to_string())]
    );
}

#[tokio::test]
async fn test_submit_failure_keeps_data() {
    let service = FakeService::new();
    service.set_failing(true);
    let center = notifications();
    let mut view = FormView::new(service.clone(), center.clone());
    fill_form(&mut view);

    let err = view.submit().await.unwrap_err();

    assert!(matches!(err, AppError::Network { .. }));
    assert_eq!(view.entry(), &complete_entry());
    assert!(!view.is_submitting());
    assert_eq!(
        messages(&center),
        vec![(NotificationKind::Error, form::SUBMIT_FAILURE.to_string())]
    );
}

#[tokio::test]
async fn test_submit_missing_field_blocks_request() {
    let service = FakeService::new();
    let center = notifications();
    let mut view = FormView::new(service.clone(), center.clone());
    view.set_field("name", "Jordan Lee").unwrap();

    let err = view.submit().await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::MissingField("Employee ID"))
    ));
    assert!(service.submitted.lock().unwrap().is_empty());
    assert_eq!(view.entry().name, "Jordan Lee");
    assert_eq!(
        messages(&center),
        vec![(NotificationKind::Error, "Employee ID is required".to_string())]
    );
}

#[tokio::test]
async fn test_form_recalculates_hours_and_rejects_direct_edit() {
    let mut view = FormView::new(FakeService::new(), notifications());

    view.set_field("clock-in", "22:00").unwrap();
    assert_eq!(view.entry().get(TimesheetField::HoursWorked), "0.00");
    view.set_field("clock_out", "06:00").unwrap();
    assert_eq!(view.entry().get(TimesheetField::HoursWorked), "8.00");

    assert!(matches!(
        view.set_field("hoursWorked", "12"),
        Err(ValidationError::ReadOnlyField(_))
    ));
    assert!(matches!(
        view.set_field("overtime", "2"),
        Err(ValidationError::UnknownField(_))
    ));
}

#[tokio::test]
async fn test_login_error_is_inline_and_cleared_by_typing() {
    let mut view = LoginView::new(Arc::new(StaticAuthenticator::new(
        Credentials::new("admin", "admin123"),
        Duration::ZERO,
    )));

    view.set_username("admin");
    view.set_password("wrong");
    assert_eq!(view.login().await, Err(AuthError::InvalidCredentials));
    assert_eq!(view.error(), Some("Invalid username or password"));
    assert!(!view.is_loading());

    view.set_password("admin123");
    assert_eq!(view.error(), None);
    assert!(view.login().await.is_ok());
    assert_eq!(view.error(), None);
}

#[tokio::test]
async fn test_dashboard_download_saves_report() {
    let dir = tempfile::tempdir().unwrap();
    let service = FakeService::new();
    let center = notifications();
    let mut view = DashboardView::new(service.clone(), center.clone(), dir.path().to_path_buf());

    let path = view.download_timesheets().await.unwrap();

    // the report name is fixed regardless of the server's suggestion
    assert_eq!(path, dir.path().join("timesheets.xlsx"));
    assert_eq!(std::fs::read(&path).unwrap(), fixtures::REPORT_BYTES);
    assert_eq!(*service.report_downloads.lock().unwrap(), 1);
    assert_eq!(
        messages(&center),
        vec![(NotificationKind::Success, dashboard::DOWNLOAD_SUCCESS.to_string())]
    );
}

#[tokio::test]
async fn test_dashboard_download_failure() {
    let dir = tempfile::tempdir().unwrap();
    let service = FakeService::new();
    service.set_failing(true);
    let center = notifications();
    let mut view = DashboardView::new(service.clone(), center.clone(), dir.path().to_path_buf());

    assert!(view.download_timesheets().await.is_err());
    assert!(!dir.path().join("timesheets.xlsx").exists());
    assert!(!view.is_downloading());
    assert_eq!(
        messages(&center),
        vec![(NotificationKind::Error, dashboard::DOWNLOAD_FAILURE.to_string())]
    );
}

#[tokio::test]
async fn test_invoice_requires_completed_upload() {
    let dir = tempfile::tempdir().unwrap();
    let service = FakeService::new();
    let center = notifications();
    // zero step: the upload never completes
    let mut view = invoice_view(&service, &center, dir.path(), 0.0);

    let err = view.generate().await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::NoCompletedUpload)
    ));

    view.add(spreadsheet("march.xlsx", 1024)).unwrap();
    assert!(view.generate().await.is_err());

    assert!(service.invoice_requests.lock().unwrap().is_empty());
    assert_eq!(
        messages(&center),
        vec![
            (NotificationKind::Error, invoice::NO_FILE.to_string()),
            (NotificationKind::Error, invoice::NO_FILE.to_string()),
        ]
    );
}

#[tokio::test]
async fn test_invoice_flow_with_five_mib_spreadsheet() {
    let dir = tempfile::tempdir().unwrap();
    let service = FakeService::new();
    service.set_invoice_filename("INV-0042.pdf");
    let center = notifications();
    let mut view = invoice_view(&service, &center, dir.path(), 100.0);

    let id = view.add(spreadsheet("march.xlsx", 5 * MIB)).unwrap();
    let file = view.uploads().wait_until_complete(id).await.unwrap();
    assert!(file.is_complete());

    let path = view.generate().await.unwrap();

    assert_eq!(path, dir.path().join("INV-0042.pdf"));
    assert_eq!(std::fs::read(&path).unwrap(), fixtures::PDF_BYTES);

    let requests = service.invoice_requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "march.xlsx");
    assert_eq!(requests[0].1, fixtures::XLSX_MIME);
    assert_eq!(requests[0].2.len(), 5 * MIB);

    // the file stays in the slot after generating
    assert_eq!(view.file().map(|f| f.id), Some(id));
    assert!(!view.is_processing());
    assert_eq!(
        messages(&center),
        vec![
            (NotificationKind::Success, "File uploaded successfully!".to_string()),
            (NotificationKind::Success, invoice::INVOICE_SUCCESS.to_string()),
        ]
    );
}

#[tokio::test]
async fn test_invoice_without_suggested_name_uses_default() {
    let dir = tempfile::tempdir().unwrap();
    let service = FakeService::new();
    let center = notifications();
    let mut view = invoice_view(&service, &center, dir.path(), 100.0);

    let id = view.add(spreadsheet("april.xls", 2048)).unwrap();
    view.uploads().wait_until_complete(id).await.unwrap();

    let path = view.generate().await.unwrap();
    assert_eq!(path, dir.path().join("invoice.pdf"));
}

#[tokio::test]
async fn test_invoice_failure_keeps_file() {
    let dir = tempfile::tempdir().unwrap();
    let service = FakeService::new();
    service.set_failing(true);
    let center = notifications();
    let mut view = invoice_view(&service, &center, dir.path(), 100.0);

    let id = view.add(spreadsheet("march.xlsx", 10)).unwrap();
    view.uploads().wait_until_complete(id).await.unwrap();

    assert!(matches!(
        view.generate().await,
        Err(AppError::Network { .. })
    ));
    assert_eq!(view.file().map(|f| f.id), Some(id));
    assert_eq!(
        messages(&center).last(),
        Some(&(NotificationKind::Error, invoice::INVOICE_FAILURE.to_string()))
    );
}

#[tokio::test]
async fn test_invoice_slot_holds_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let service = FakeService::new();
    let center = notifications();
    let mut view = invoice_view(&service, &center, dir.path(), 0.0);

    view.add(spreadsheet("march.xlsx", 10)).unwrap();
    assert!(matches!(
        view.add(spreadsheet("april.xlsx", 10)),
        Err(ValidationError::SlotOccupied(_))
    ));

    assert_eq!(view.remove().map(|f| f.name), Some("march.xlsx".to_string()));
    assert!(view.file().is_none());
    assert!(view.add(spreadsheet("april.xlsx", 10)).is_ok());
}

#[tokio::test]
async fn test_invoice_rejects_non_excel_and_oversized() {
    let dir = tempfile::tempdir().unwrap();
    let service = FakeService::new();
    let center = notifications();
    let mut view = invoice_view(&service, &center, dir.path(), 0.0);

    assert!(view.add(FileCandidate::new("summary.pdf", b"%PDF".to_vec())).is_err());
    assert!(view.add(spreadsheet("huge.xlsx", 10 * MIB + 1)).is_err());
    assert!(view.file().is_none());
    assert_eq!(
        messages(&center),
        vec![
            (
                NotificationKind::Error,
                "Please upload only Excel files (.xlsx, .xls)".to_string()
            ),
            (
                NotificationKind::Error,
                "File size must be less than 10MB".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn test_attachments_add_remove_view() {
    let center = notifications();
    let viewer = Arc::new(RecordingViewer::default());
    let uploads = UploadManager::new(UploadPolicy::attachments(MAX_SIZE), center.clone())
        .with_step_factory(|_| Box::new(FixedStep(0.0)));
    let mut view = AttachmentsView::new(uploads, viewer.clone());

    view.add(FileCandidate::new("receipt.pdf", b"%PDF".to_vec())).unwrap();
    view.add(spreadsheet("hours.xlsx", 10)).unwrap();
    assert!(matches!(
        view.add(FileCandidate::new("receipt.pdf", b"again".to_vec())),
        Err(ValidationError::DuplicateFile(_))
    ));
    assert_eq!(
        messages(&center),
        vec![(
            NotificationKind::Error,
            "File \"receipt.pdf\" already exists.".to_string()
        )]
    );

    let opened = view.view(2).unwrap().to_path_buf();
    assert_eq!(viewer.opened.lock().unwrap().clone(), vec![opened.clone()]);
    assert!(opened.exists());
    view.close_views();
    assert!(!opened.exists());

    assert_eq!(view.remove(1).unwrap().name, "receipt.pdf");
    assert!(view.remove(5).is_err());
    let names: Vec<String> = view.files().into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["hours.xlsx".to_string()]);

    // same name is accepted again after removal
    view.add(FileCandidate::new("receipt.pdf", b"%PDF".to_vec())).unwrap();
}

#[tokio::test]
async fn test_attachment_views_keep_one_copy_per_file() {
    let center = notifications();
    let viewer = Arc::new(RecordingViewer::default());
    let uploads = UploadManager::new(UploadPolicy::attachments(MAX_SIZE), center.clone())
        .with_step_factory(|_| Box::new(FixedStep(0.0)));
    let mut view = AttachmentsView::new(uploads, viewer.clone());
    view.add(FileCandidate::new("receipt.pdf", b"%PDF".to_vec())).unwrap();
    view.add(spreadsheet("hours.xlsx", 10)).unwrap();

    for _ in 0..5 {
        view.view(1).unwrap();
    }
    view.view(2).unwrap();
    assert_eq!(view.open_view_count(), 2);

    let opened = viewer.opened.lock().unwrap().clone();
    assert_eq!(opened.len(), 6);
    let alive: Vec<_> = opened.iter().filter(|p| p.exists()).collect();
    assert_eq!(alive, vec![&opened[4], &opened[5]]);

    // removing a file deletes its open copy too
    view.remove(1).unwrap();
    assert_eq!(view.open_view_count(), 1);
    assert!(!opened[4].exists());
    assert!(opened[5].exists());

    drop(view);
    assert!(!opened[5].exists());
}

#[tokio::test]
async fn test_submit_flag_is_set_only_while_request_runs() {
    let service = FakeService::new();
    service.set_stalled(true);
    let mut view = FormView::new(service.clone(), notifications());
    fill_form(&mut view);
    let flag = view.busy_flag();

    {
        let mut submit = Box::pin(view.submit());
        tokio::select! {
            biased;
            _ = &mut submit => panic!("a stalled request cannot finish"),
            _ = service.started.notified() => {}
        }
        assert!(flag.is_busy());
        assert!(flag.try_acquire().is_none());
    }

    // the request future was dropped mid-flight
    assert!(!flag.is_busy());
    assert!(!view.is_submitting());
}

#[tokio::test]
async fn test_cancelled_submit_allows_retry() {
    let service = FakeService::new();
    service.set_stalled(true);
    let center = notifications();
    let mut view = FormView::new(service.clone(), center.clone());
    fill_form(&mut view);

    let timed_out = tokio::time::timeout(Duration::from_millis(20), view.submit()).await;
    assert!(timed_out.is_err());
    assert!(!view.is_submitting());
    assert_eq!(view.entry(), &complete_entry());

    service.set_stalled(false);
    view.submit().await.unwrap();
    assert_eq!(service.submitted.lock().unwrap().len(), 1);
    assert_eq!(
        messages(&center),
        vec![(NotificationKind::Success, form::SUBMIT_SUCCESS.to_string())]
    );
}

#[tokio::test]
async fn test_submit_while_busy_is_refused() {
    let service = FakeService::new();
    let center = notifications();
    let mut view = FormView::new(service.clone(), center.clone());
    fill_form(&mut view);

    let held = view.busy_flag().try_acquire().unwrap();
    let err = view.submit().await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::RequestInFlight)
    ));
    assert!(service.submitted.lock().unwrap().is_empty());
    assert!(center.current().is_empty());
    assert_eq!(view.entry(), &complete_entry());

    drop(held);
    view.submit().await.unwrap();
    assert_eq!(service.submitted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancelled_invoice_request_keeps_file_and_clears_flag() {
    let dir = tempfile::tempdir().unwrap();
    let service = FakeService::new();
    let center = notifications();
    let mut view = invoice_view(&service, &center, dir.path(), 100.0);
    let id = view.add(spreadsheet("march.xlsx", 10)).unwrap();
    view.uploads().wait_until_complete(id).await.unwrap();

    service.set_stalled(true);
    let timed_out = tokio::time::timeout(Duration::from_millis(20), view.generate()).await;
    assert!(timed_out.is_err());
    assert!(!view.is_processing());
    assert_eq!(view.file().map(|f| f.id), Some(id));

    let held = view.busy_flag().try_acquire().unwrap();
    assert!(matches!(
        view.generate().await,
        Err(AppError::Validation(ValidationError::RequestInFlight))
    ));
    drop(held);

    service.set_stalled(false);
    assert_eq!(
        view.generate().await.unwrap(),
        dir.path().join("invoice.pdf")
    );
}
