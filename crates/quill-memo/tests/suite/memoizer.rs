use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use quill_memo::{CallArgs, KeyedMemoizer, MemoError, Memo, Signature};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Value {
    Int(i64),
    Str(String),
}

impl Value {
    fn int(&self) -> i64 {
        match self {
            Value::Int(value) => *value,
            Value::Str(text) => text.len() as i64,
        }
    }
}

fn call_counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    (Arc::clone(&calls), calls)
}

#[test]
fn square_runs_once_per_argument() {
    let (calls, counter) = call_counter();
    let square: KeyedMemoizer<i64, Vec<i64>, i64> =
        KeyedMemoizer::new(Signature::new("square", ["x"]), move |args| {
            counter.fetch_add(1, Ordering::SeqCst);
            let x = args.values()[0];
            Ok(x * x)
        });

    assert_eq!(square.call(CallArgs::positional([4])), Ok(16));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(square.call(CallArgs::positional([4])), Ok(16));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(square.contains_key(CallArgs::positional([4])), Ok(true));
    assert_eq!(square.contains_key(CallArgs::positional([5])), Ok(false));
}

#[test]
fn cached_result_matches_direct_call() {
    fn describe(args: &quill_memo::BoundArgs<Value>) -> Result<String, MemoError> {
        let name = args.get("name")?;
        let count = args.get("count")?;
        Ok(format!("{name:?} x{}", count.int()))
    }

    let memo = KeyedMemoizer::new(Signature::new("describe", ["name", "count"]), describe);
    let call = || {
        CallArgs::positional([Value::Str("node".into()), Value::Int(3)])
    };

    let direct = describe(
        &Signature::new("describe", ["name", "count"])
            .bind(call())
            .unwrap(),
    )
    .unwrap();
    assert_eq!(memo.call(call()).unwrap(), direct);
    assert_eq!(memo.call(call()).unwrap(), direct);
    assert_eq!(memo.len(), 1);
}

#[test]
fn narrow_key_returns_stale_result_for_ignored_argument() {
    let (calls, counter) = call_counter();
    let add: KeyedMemoizer<i64, i64, i64> = KeyedMemoizer::with_key(
        Signature::new("add", ["x", "y"]),
        |args| Ok(*args.get("x")?),
        move |args| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(args.values().iter().sum())
        },
    );

    assert_eq!(add.call(CallArgs::positional([1, 2])), Ok(3));
    // `y` is not part of the key, so this is a hit on the first result.
    assert_eq!(add.call(CallArgs::positional([1, 50])), Ok(3));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn omitted_and_explicit_defaults_share_an_entry() {
    let (calls, counter) = call_counter();
    let scaled: KeyedMemoizer<i64, Vec<i64>, i64> = KeyedMemoizer::new(
        Signature::new("scaled", ["x", "y"]).with_defaults([2]),
        move |args| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(args.values()[0] * args.values()[1])
        },
    );

    assert_eq!(scaled.call(CallArgs::positional([1])), Ok(2));
    assert_eq!(scaled.call(CallArgs::positional([1, 2])), Ok(2));
    assert_eq!(scaled.call(CallArgs::positional([1]).kwarg("y", 2)), Ok(2));
    assert_eq!(scaled.call(CallArgs::new().kwarg("y", 2).kwarg("x", 1)), Ok(2));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(scaled.call(CallArgs::positional([1, 3])), Ok(3));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(scaled.len(), 2);
}

#[test]
fn keyword_calls_hit_entries_made_positionally() {
    let (calls, counter) = call_counter();
    let pair: KeyedMemoizer<i64, Vec<i64>, (i64, i64)> =
        KeyedMemoizer::new(Signature::new("pair", ["a", "b"]), move |args| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok((args.values()[0], args.values()[1]))
        });

    assert_eq!(pair.call(CallArgs::positional([1, 2])), Ok((1, 2)));
    assert_eq!(pair.call(CallArgs::positional([1]).kwarg("b", 2)), Ok((1, 2)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn key_without_receiver_is_shared_across_receivers() {
    let area: KeyedMemoizer<Value, i64, i64> = KeyedMemoizer::with_key(
        Signature::new("area", ["self", "scale"]),
        |args| Ok(args.get("scale")?.int()),
        |args| Ok(args.get("self")?.int() * args.get("scale")?.int()),
    );

    let small = Value::Int(2);
    let large = Value::Int(100);
    assert_eq!(area.call(CallArgs::positional([small, Value::Int(3)])), Ok(6));
    assert_eq!(area.call(CallArgs::positional([large, Value::Int(3)])), Ok(6));
}

#[test]
fn undeclared_parameter_in_key_fails_at_call_time() {
    let memo: KeyedMemoizer<i64, i64, i64> = KeyedMemoizer::with_key(
        Signature::new("f", ["x"]),
        |args| Ok(*args.get("z")?),
        |args| Ok(args.values()[0]),
    );

    // Construction succeeded; the failure shows up on every call that evaluates the key.
    for _ in 0..2 {
        assert_eq!(
            memo.call(CallArgs::positional([1])),
            Err(MemoError::UnknownParameter { name: "z".into() })
        );
    }
}

#[test]
fn externally_locked_memoizer_is_shared_across_threads() {
    let (calls, counter) = call_counter();
    let memo: KeyedMemoizer<i64, Vec<i64>, i64> =
        KeyedMemoizer::new(Signature::new("cube", ["x"]), move |args| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(args.values()[0].pow(3))
        });
    let memo = Mutex::new(memo);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let memo = memo.lock().expect("memo mutex poisoned");
                assert_eq!(memo.call(CallArgs::positional([3])), Ok(27));
            });
        }
    });
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn typed_memo_keys_on_the_whole_argument() {
    let (calls, counter) = call_counter();
    let join = Memo::new("join", move |(a, b): &(String, String)| {
        counter.fetch_add(1, Ordering::SeqCst);
        format!("{a}.{b}")
    });

    let args = ("pkg".to_owned(), "mod".to_owned());
    assert_eq!(join.call(&args), "pkg.mod");
    assert_eq!(join.call(&args.clone()), "pkg.mod");
    assert!(join.contains_key(&args));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log buffer poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().expect("log buffer poisoned");
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

#[test]
fn memo_calls_trace_one_miss_then_hits() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let memo: KeyedMemoizer<i64, Vec<i64>, i64> =
            KeyedMemoizer::new(Signature::new("negate", ["x"]), |args| Ok(-args.values()[0]));
        assert_eq!(memo.call(CallArgs::positional([7])), Ok(-7));
        assert_eq!(memo.call(CallArgs::positional([7])), Ok(-7));
        assert_eq!(memo.call(CallArgs::positional([7])), Ok(-7));
    });

    let lines = logs.lines();
    let misses = lines.iter().filter(|line| line.contains("memo miss")).count();
    let hits = lines.iter().filter(|line| line.contains("memo hit")).count();
    assert_eq!((misses, hits), (1, 2), "{lines:#?}");
    assert!(
        lines
            .iter()
            .filter(|line| line.contains("memo "))
            .all(|line| line.contains("quill.memo") && line.contains("function=negate")),
        "{lines:#?}"
    );
}
