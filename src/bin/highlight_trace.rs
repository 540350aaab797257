/// Command-line tracer for the highlight pipeline.
/// Feeds a markup fragment and a spoken phrase through the reader with a
/// scripted speech engine, printing the element's markup after every repaint.
/// Frames go to stdout; notices and structured logs go to stderr.
use readalong::{
    word_events, MarkupBuffer, MarkupTarget, Notice, NoticeSink, Reader, ReaderSettings,
    ScriptedEngine, SpeechEvent,
};

// --- Notice Printing ---

struct PrintSink;

impl NoticeSink for PrintSink {
    fn notify(&self, notice: Notice) {
        match serde_json::to_string(&notice) {
            Ok(json) => eprintln!("highlight-trace: {json}"),
            Err(e) => eprintln!("highlight-trace: failed to serialize notice: {e}"),
        }
    }
}

// --- Main ---

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(markup), Some(spoken)) = (args.next(), args.next()) else {
        eprintln!("usage: highlight_trace <markup> <spoken-text>");
        std::process::exit(1);
    };

    let mut page = MarkupBuffer::new(markup);
    let mut reader = Reader::new(
        ScriptedEngine::new(),
        ReaderSettings::default(),
        Box::new(PrintSink),
    );

    if let Err(e) = reader.read_aloud("page", &mut page, &spoken) {
        eprintln!("highlight-trace: {e}");
        std::process::exit(1);
    }

    for event in word_events(&spoken) {
        let boundary = matches!(event, SpeechEvent::WordBoundary { .. });
        reader.handle_event(&mut page, event);
        if boundary {
            println!("{}", page.inner_markup());
        }
    }

    // the End event restored the snapshot
    println!("{}", page.inner_markup());
}
