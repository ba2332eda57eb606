use ertrainer::attempt::PhraseAttempt;
use ertrainer::phrase::Phrase;
use ertrainer::render::{render_schema, render_solutions};
use ertrainer::schema::Schema;
use ertrainer::verify::ArrowMode;
use serde_json::json;
use std::env;
use std::fs;
use std::process;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <phrases.json> [options]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -p, --phrase <n>     Only phrase n (0-based, default: all)");
    eprintln!("  -a, --answer <file>  Grade the schema in <file> (needs a single phrase)");
    eprintln!("  -m, --arrows <mode>  Arrow handling: auto, manual (default: auto)");
    eprintln!("  -j, --json           Print JSON instead of text");
    process::exit(1);
}

fn fail(message: String) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        usage(&args[0]);
    }

    let input_path = &args[1];
    let mut phrase_index: Option<usize> = None;
    let mut answer_path: Option<String> = None;
    let mut mode = ArrowMode::Auto;
    let mut as_json = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-p" | "--phrase" => {
                i += 1;
                if i < args.len() {
                    phrase_index = Some(args[i].parse().unwrap_or_else(|_| {
                        fail(format!("Invalid phrase index: {}", args[i]))
                    }));
                }
            }
            "-a" | "--answer" => {
                i += 1;
                if i < args.len() {
                    answer_path = Some(args[i].clone());
                }
            }
            "-m" | "--arrows" => {
                i += 1;
                if i < args.len() {
                    mode = ArrowMode::from_str(&args[i])
                        .unwrap_or_else(|| fail(format!("Invalid arrow mode: {}", args[i])));
                }
            }
            "-j" | "--json" => as_json = true,
            "-h" | "--help" => usage(&args[0]),
            _ => fail(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    let input = fs::read_to_string(input_path)
        .unwrap_or_else(|e| fail(format!("Failed to read {}: {}", input_path, e)));

    // A dataset is a JSON array; a single phrase object is accepted too.
    let parsed = if input.trim_start().starts_with('[') {
        Phrase::list_from_json(&input)
    } else {
        Phrase::from_json(&input).map(|p| vec![p])
    };
    let phrases = parsed.unwrap_or_else(|e| fail(format!("Invalid phrase data: {}", e)));

    let selected: Vec<(usize, Phrase)> = match phrase_index {
        Some(n) => match phrases.get(n) {
            Some(p) => vec![(n, p.clone())],
            None => fail(format!("No phrase {} ({} loaded)", n, phrases.len())),
        },
        None => phrases.into_iter().enumerate().collect(),
    };

    let answer = answer_path.map(|path| {
        if selected.len() != 1 {
            fail("Grading an answer needs exactly one phrase; use --phrase".to_string());
        }
        let text = fs::read_to_string(&path)
            .unwrap_or_else(|e| fail(format!("Failed to read {}: {}", path, e)));
        Schema::from_json(&text).unwrap_or_else(|e| fail(format!("Invalid answer schema: {}", e)))
    });

    for (index, phrase) in selected {
        let attempt = PhraseAttempt::new(phrase);
        let graded = answer.as_ref().map(|a| {
            attempt
                .grade(a, mode)
                .unwrap_or_else(|e| fail(format!("Cannot grade answer: {}", e)))
        });

        if as_json {
            let mut out = json!({
                "index": index,
                "phrase": attempt.phrase(),
                "classification": attempt.classification(),
                "solutions": attempt.solutions(),
            });
            if let Some((verdict, keys)) = &graded {
                out["verdict"] = json!(verdict);
                out["feedback"] = json!(keys);
            }
            println!("{}", out);
            continue;
        }

        let phrase = attempt.phrase();
        println!(
            "#{} {} [{}]",
            index,
            phrase.entities.join(" / "),
            phrase.relation.as_deref().unwrap_or("is-a"),
        );
        println!("Classification: {:?}", attempt.classification());
        if attempt.is_gradable() {
            print!("{}", render_solutions(attempt.solutions(), phrase));
        } else {
            println!("No solution: this relationship cannot be graded");
        }

        if let (Some((verdict, keys)), Some(answer)) = (&graded, &answer) {
            println!("Answer:");
            for line in render_schema(answer, phrase).lines() {
                println!("  {}", line);
            }
            let result = match verdict.matched {
                Some(0) => "correct".to_string(),
                Some(n) => format!("correct (alternate solution {})", n + 1),
                None => "incorrect".to_string(),
            };
            println!("Result: {}", result);
            let keys: Vec<&str> = keys.iter().map(|k| k.key()).collect();
            println!("Feedback: {}", keys.join(", "));
        }
        println!();
    }
}
