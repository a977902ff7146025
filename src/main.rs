use std::{
    io::Write,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, Context};
use clap::Parser;
use route_tree::{
    MemoryRequest, ReasonPhrase, Request, Response, ResponseWriter, Router, RouterOptions,
};
use tracing::{info, Level};

const API_TOKEN: &str = "secret";

/// Routes a single request through the demo router and prints the response.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Request method, e.g. GET.
    method: String,

    /// Request target, e.g. /tasks?limit=2.
    target: String,

    /// Prefix stripped from the target before routing.
    #[arg(long, default_value = "")]
    root: String,

    /// Request header as `Name: value`. May be repeated.
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Request body.
    #[arg(short, long)]
    body: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

type Tasks = Arc<Mutex<Vec<String>>>;

fn build_router(tasks: Tasks) -> anyhow::Result<Router> {
    let mut router = Router::new();

    router
        .get("/", |w: &mut dyn Response, _: &mut dyn Request| {
            w.set_body_str("hello");
        })?
        .get(
            ["/hello/:name", "/hi/:name"],
            |w: &mut dyn Response, r: &mut dyn Request| {
                let name = r.param("name").unwrap_or("stranger");
                w.set_body_str(&format!("hello, {name}"));
            },
        )?;

    router
        .group("/tasks")?
        .use_middleware(require_token)
        .get("/", {
            let tasks = tasks.clone();
            move |w: &mut dyn Response, r: &mut dyn Request| list_tasks(&tasks, w, r)
        })?
        .post("/", {
            let tasks = tasks.clone();
            move |w: &mut dyn Response, r: &mut dyn Request| add_task(&tasks, w, r)
        })?
        .get("/:id", {
            let tasks = tasks.clone();
            move |w: &mut dyn Response, r: &mut dyn Request| get_task(&tasks, w, r)
        })?
        .end();

    Ok(router)
}

fn require_token(w: &mut dyn Response, r: &mut dyn Request) -> bool {
    let expected = format!("Bearer {API_TOKEN}");
    if r.header("authorization") == Some(expected.as_str()) {
        r.extra_mut().set("user", "admin");
        return true;
    }
    w.set_reason_phrase(ReasonPhrase::Unauthorized);
    w.add_header("WWW-Authenticate", "Bearer");
    w.end();
    false
}

fn list_tasks(tasks: &Tasks, w: &mut dyn Response, r: &mut dyn Request) -> anyhow::Result<()> {
    let limit = match r.query("limit") {
        Some(limit) => limit.parse().context("limit is not a number")?,
        None => usize::MAX,
    };
    let tasks = tasks.lock().map_err(|_| anyhow!("tasks lock poisoned"))?;
    let body = tasks
        .iter()
        .take(limit)
        .enumerate()
        .map(|(id, title)| format!("{id}: {title}\n"))
        .collect::<String>();
    w.set_body_str(&body);
    Ok(())
}

fn add_task(tasks: &Tasks, w: &mut dyn Response, r: &mut dyn Request) -> anyhow::Result<()> {
    let title = r
        .body()
        .map(|body| String::from_utf8_lossy(body).trim().to_owned())
        .unwrap_or_default();
    if title.is_empty() {
        w.set_reason_phrase(ReasonPhrase::BadRequest);
        w.set_body_str("title is required");
        return Err(anyhow!("empty task title"));
    }

    let mut tasks = tasks.lock().map_err(|_| anyhow!("tasks lock poisoned"))?;
    info!(user = r.extra().get("user"), title = %title, "task added");
    tasks.push(title);
    w.set_reason_phrase(ReasonPhrase::Created);
    w.add_header("Location", &format!("/tasks/{}", tasks.len() - 1));
    Ok(())
}

fn get_task(tasks: &Tasks, w: &mut dyn Response, r: &mut dyn Request) -> bool {
    let Some(id) = r.param("id").and_then(|id| id.parse::<usize>().ok()) else {
        w.set_reason_phrase(ReasonPhrase::BadRequest);
        return false;
    };
    let task = match tasks.lock() {
        Ok(tasks) => tasks.get(id).cloned(),
        Err(_) => None,
    };
    match task {
        Some(title) => {
            w.set_body_str(&title);
            true
        }
        None => {
            w.set_reason_phrase(ReasonPhrase::NotFound);
            false
        }
    }
}

fn parse_header(header: &str) -> anyhow::Result<(&str, &str)> {
    let (k, v) = header
        .split_once(':')
        .ok_or_else(|| anyhow!("header {:?} is not `Name: value`", header))?;
    Ok((k.trim(), v.trim()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let tasks: Tasks = Arc::new(Mutex::new(vec![
        "write the router".to_owned(),
        "write the tests".to_owned(),
    ]));
    let router = build_router(tasks)?;

    let mut r = MemoryRequest::new()
        .with_method(args.method)
        .with_url(args.target);
    for header in &args.headers {
        let (k, v) = parse_header(header)?;
        r = r.with_header(k, v);
    }
    if let Some(body) = args.body {
        r = r.with_body(body);
    }

    let options = RouterOptions::new().with_root_url(args.root);
    let mut w = ResponseWriter::new_empty();
    let res = router.listen(&options, &mut w, &mut r);
    info!(ok = res.ok, params = ?res.params, "done");

    std::io::stdout().write_all(&w.write())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send(router: &Router, r: MemoryRequest) -> ResponseWriter {
        let mut r = r;
        let mut w = ResponseWriter::new_empty();
        router.listen(&RouterOptions::default(), &mut w, &mut r);
        w
    }

    fn authorized(method: &str, url: &str) -> MemoryRequest {
        MemoryRequest::new()
            .with_method(method)
            .with_url(url)
            .with_header("Authorization", format!("Bearer {API_TOKEN}"))
    }

    fn demo() -> (Router, Tasks) {
        let tasks: Tasks = Arc::new(Mutex::new(vec!["first".to_owned()]));
        (build_router(tasks.clone()).unwrap(), tasks)
    }

    #[test]
    fn test_hello() {
        let (router, _) = demo();
        let w = send(
            &router,
            MemoryRequest::new().with_method("GET").with_url("/hi/J%C3%BCrgen"),
        );
        assert_eq!(w.get_body(), "hello, Jürgen".as_bytes());
    }

    #[test]
    fn test_tasks_require_token() {
        let (router, _) = demo();
        let w = send(
            &router,
            MemoryRequest::new().with_method("GET").with_url("/tasks"),
        );
        assert!(w.is_status(401));
        assert_eq!(w.get_header("WWW-Authenticate"), Some("Bearer"));
    }

    #[test]
    fn test_add_and_get_task() {
        let (router, tasks) = demo();
        let w = send(&router, authorized("POST", "/tasks").with_body("second"));
        assert!(w.is_status(201));
        assert_eq!(w.get_header("Location"), Some("/tasks/1"));
        assert_eq!(tasks.lock().unwrap().len(), 2);

        let w = send(&router, authorized("GET", "/tasks/1"));
        assert_eq!(w.get_body(), b"second");

        let w = send(&router, authorized("GET", "/tasks?limit=1"));
        assert_eq!(w.get_body(), b"0: first\n");
    }

    #[test]
    fn test_token_check_records_user() {
        let (router, _) = demo();
        let mut r = authorized("GET", "/tasks");
        let mut w = ResponseWriter::new_empty();
        assert!(router.listen(&RouterOptions::default(), &mut w, &mut r).ok);
        assert_eq!(r.extra().get("user"), Some("admin"));
    }

    #[test]
    fn test_empty_task_is_rejected() {
        let (router, tasks) = demo();
        let w = send(&router, authorized("POST", "/tasks"));
        assert!(w.is_status(400));
        assert_eq!(tasks.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(parse_header("X-Id: 7").unwrap(), ("X-Id", "7"));
        assert!(parse_header("nope").is_err());
    }
}
