use lazytodo_core::db::open_db_in_memory;
use chrono::NaiveDate;
use lazytodo_core::{
    NewProject, NewRoutine, NewTask, OwnerId, ProjectService, RepoError, RoutineService,
    ServiceError, SqliteProjectRepository, SqliteRoutineRepository, SqliteTaskRepository,
    TaskRepository, TaskService, Token, TokenGenerator,
};
use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};

/// Hands out pre-scripted tokens in order.
struct ScriptedTokens(RefCell<VecDeque<&'static str>>);

impl ScriptedTokens {
    fn new(tokens: &[&'static str]) -> Self {
        Self(RefCell::new(tokens.iter().copied().collect()))
    }
}

impl TokenGenerator for ScriptedTokens {
    fn generate(&self) -> Token {
        let next = self.0.borrow_mut().pop_front().expect("script exhausted");
        Token::parse(next).unwrap()
    }
}

fn owner(subject: &str) -> OwnerId {
    OwnerId::new(subject).unwrap()
}

fn deadline() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()
}

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

#[test]
fn collision_is_retried_once_with_a_fresh_token() {
    let conn = open_db_in_memory().unwrap();
    let tokens = ScriptedTokens::new(&["AAAAAAAAAAAA", "AAAAAAAAAAAA", "BBBBBBBBBBBB"]);
    let service =
        TaskService::with_token_generator(SqliteTaskRepository::try_new(&conn).unwrap(), tokens);
    let alice = owner("alice");

    let first = service.create_task(&alice, NewTask::new("one", 0)).unwrap();
    assert_eq!(first.token.as_str(), "AAAAAAAAAAAA");

    let second = service.create_task(&alice, NewTask::new("two", 0)).unwrap();
    assert_eq!(second.token.as_str(), "BBBBBBBBBBBB");
}

#[test]
fn repeated_collision_surfaces_conflict() {
    let conn = open_db_in_memory().unwrap();
    let tokens = ScriptedTokens::new(&["CCCCCCCCCCCC", "CCCCCCCCCCCC", "CCCCCCCCCCCC"]);
    let service =
        TaskService::with_token_generator(SqliteTaskRepository::try_new(&conn).unwrap(), tokens);
    let alice = owner("alice");

    service.create_task(&alice, NewTask::new("one", 0)).unwrap();
    let err = service
        .create_task(&alice, NewTask::new("two", 0))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict));
    assert_eq!(service.list_home_tasks(&alice, 1).unwrap().total_items, 1);
}

#[test]
fn tokens_of_deleted_tasks_are_never_reissued() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let alice = owner("alice");

    let token = Token::parse("DDDDDDDDDDDD").unwrap();
    let task = NewTask::new("short lived", 0);
    let task = lazytodo_core::Task {
        token: token.clone(),
        owner: alice.clone(),
        name: task.name,
        detail: task.detail,
        time_to_start: task.time_to_start,
        done: task.done,
    };
    repo.create_task(&task).unwrap();
    repo.delete_task(&token).unwrap();

    assert!(matches!(
        repo.create_task(&task),
        Err(RepoError::TokenConflict(conflicting)) if conflicting == token
    ));
}

#[test]
fn many_created_tasks_get_distinct_tokens() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let alice = owner("alice");

    let mut seen = HashSet::new();
    for index in 0..500 {
        let task = service
            .create_task(&alice, NewTask::new(format!("task {index}"), index))
            .unwrap();
        assert!(seen.insert(task.token));
    }
    assert_eq!(seen.len(), 500);
}

#[test]
fn project_task_collision_is_retried_without_leaving_a_partial_task() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = owner("alice");
    // The second token repeats the project's token, so the first task insert
    // hits the ledger and must roll back before the retry.
    let tokens = ScriptedTokens::new(&["111111111111", "111111111111", "222222222222"]);

    let task = {
        let mut projects = ProjectService::with_token_generator(
            SqliteProjectRepository::try_new(&mut conn).unwrap(),
            tokens,
        );
        let project = projects
            .create_project(&alice, NewProject::new("Garden", deadline()))
            .unwrap();
        assert_eq!(project.token.as_str(), "111111111111");

        let task = projects
            .create_project_task(&alice, project.token.as_str(), NewTask::new("dig", 0))
            .unwrap();
        let linked = projects
            .list_project_tasks(&alice, project.token.as_str())
            .unwrap();
        assert_eq!(linked, vec![task.clone()]);
        task
    };
    assert_eq!(task.token.as_str(), "222222222222");

    assert_eq!(count(&conn, "SELECT COUNT(*) FROM tasks;"), 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM project_tasks;"), 1);
    assert_eq!(
        count(&conn, "SELECT COUNT(*) FROM tasks WHERE token = '111111111111';"),
        0
    );
}

#[test]
fn repeated_routine_collision_surfaces_conflict() {
    let conn = open_db_in_memory().unwrap();
    let alice = owner("alice");
    let tokens = ScriptedTokens::new(&["333333333333", "333333333333", "333333333333"]);
    let routines = RoutineService::with_token_generator(
        SqliteRoutineRepository::try_new(&conn).unwrap(),
        tokens,
    );

    routines
        .create_routine(&alice, NewRoutine::new("stretch", 0))
        .unwrap();
    let err = routines
        .create_routine(&alice, NewRoutine::new("read", 0))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict));
    assert_eq!(routines.list_routines(&alice, 1).unwrap().total_items, 1);
}

#[test]
fn task_token_is_not_reissued_to_a_project() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = owner("alice");

    {
        let tasks = TaskService::with_token_generator(
            SqliteTaskRepository::try_new(&conn).unwrap(),
            ScriptedTokens::new(&["444444444444"]),
        );
        tasks.create_task(&alice, NewTask::new("call mum", 0)).unwrap();
    }

    let projects = ProjectService::with_token_generator(
        SqliteProjectRepository::try_new(&mut conn).unwrap(),
        ScriptedTokens::new(&["444444444444", "444444444444"]),
    );
    let err = projects
        .create_project(&alice, NewProject::new("Family", deadline()))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict));
    assert_eq!(projects.list_projects(&alice, 1).unwrap().total_items, 0);
}
