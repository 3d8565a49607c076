//! Session store scenarios as driven by the external run and log collaborators.

use std::sync::{Arc, Mutex};

use pulsar_core::{LogStatus, OutputTab, Project, ProjectId, SessionState, Snippet};

#[test]
fn logs_survive_return_to_idle() {
    let session = SessionState::new();
    let statuses = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&statuses);
    let sub = session
        .log_status
        .subscribe(move |status| sink.lock().unwrap().push(*status));

    assert_eq!(session.log_status.get(), LogStatus::Idle);
    session.log_status.set(LogStatus::Loading);
    session.log_status.set(LogStatus::Tailing);
    session.logs.set("[2024-01-01] local.INFO: booted\n".into());
    session
        .logs
        .update(|logs| format!("{logs}[2024-01-01] local.INFO: request\n"));
    session.log_status.set(LogStatus::Idle);

    assert_eq!(
        session.logs.get(),
        "[2024-01-01] local.INFO: booted\n[2024-01-01] local.INFO: request\n"
    );
    assert_eq!(
        *statuses.lock().unwrap(),
        vec![LogStatus::Loading, LogStatus::Tailing, LogStatus::Idle]
    );
    sub.unsubscribe();
}

#[test]
fn run_cycle_updates_output_and_running_flag() {
    let session = SessionState::new();
    let flags = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&flags);
    let _sub = session
        .is_running
        .subscribe(move |running| sink.lock().unwrap().push(*running));

    session.is_running.set(true);
    session.output.set("42".into());
    session.is_running.set(false);

    assert_eq!(*flags.lock().unwrap(), vec![true, false]);
    assert_eq!(session.output.get(), "42");
    // Switching tabs is unrelated to run state.
    session.output_tab.set(OutputTab::Logs);
    assert_eq!(session.output.get(), "42");
}

#[test]
fn project_selection_and_snippets_are_plain_cells() {
    let session = SessionState::new();
    let shop = Project {
        id: ProjectId::from("1"),
        name: "shop".into(),
        path: "/srv/shop".into(),
    };
    session.projects.set(vec![shop.clone()]);
    session.current_project.set(Some(shop.clone()));
    session.snippets.update(|snippets| {
        let mut next = snippets.clone();
        next.push(Snippet {
            name: "count users".into(),
            code: "User::count();".into(),
        });
        next
    });

    assert_eq!(session.current_project.get(), Some(shop));
    assert_eq!(session.snippets.get().len(), 1);

    session.current_project.set(None);
    assert_eq!(session.current_project.get(), None);
}
