//! Replay range queries against an address dictionary and print the result

#![deny(
    clippy::disallowed_methods,
    clippy::suspicious,
    clippy::style,
    clippy::clone_on_ref_ptr,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::module_name_repetitions)]

fn main() { entry::main(); }

mod entry {
    use std::{
        fs::File,
        io::{self, prelude::*, BufReader},
        path::PathBuf,
    };

    use anyhow::{Context, Result};
    use clap::Parser;
    use rangedict::{ListAttribute, Mode, RangeDict};
    use tracing_subscriber::{prelude::*, EnvFilter};

    use super::script::{self, Query, Tag};

    #[derive(Debug, Parser)]
    #[command(version, author, about)]
    struct Opts {
        /// Print more verbose logs
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,

        /// Log filter, using env_logger-like syntax
        #[arg(long, env = "RUST_LOG")]
        log_filter: Option<String>,

        /// Yield every stored range for every query
        #[arg(long)]
        entire: bool,

        /// In entire mode, only fill gaps inside the queried window
        #[arg(long)]
        scoped: bool,

        /// How to tag the ranges each query yields
        #[arg(long, value_enum, default_value = "query")]
        mark: script::Mark,

        /// Replay the built-in demonstration sequence
        #[arg(long, conflicts_with = "file")]
        demo: bool,

        /// File of queries, one `BEGIN END [entire] [@label]` per line.
        /// Reads standard input if omitted.
        file: Option<PathBuf>,
    }

    macro_rules! init_error {
        ($($args:tt)*) => ({
            ::tracing::error!($($args)*);
            ::std::process::exit(1);
        })
    }

    fn fmt_layer<S>() -> impl tracing_subscriber::Layer<S> + Send + Sync
    where S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> {
        // stdout is reserved for query output
        tracing_subscriber::fmt::layer().with_writer(io::stderr)
    }

    #[inline]
    pub fn main() {
        let tmp_logger =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(fmt_layer()));

        let opts = Opts::parse();

        let level = match (cfg!(debug_assertions), opts.verbose) {
            (false, 0) => "info",
            (false, 1) | (true, 0) => "debug",
            _ => "trace",
        };
        let log_filter = opts.log_filter.as_deref().unwrap_or(level);

        tracing_subscriber::registry()
            .with(
                EnvFilter::try_new(log_filter)
                    .unwrap_or_else(|e| init_error!("Invalid log filter {log_filter:?}: {e}")),
            )
            .with(fmt_layer())
            .try_init()
            .unwrap_or_else(|e| init_error!("Error initializing logger: {e}"));

        drop(tmp_logger);
        tracing::debug!("{opts:#?}");

        std::process::exit(run(opts).map_or_else(
            |e| {
                tracing::error!("{e:?}");
                1
            },
            |()| 0,
        ));
    }

    #[inline]
    fn run(
        Opts {
            verbose: _,
            log_filter: _,
            entire,
            scoped,
            mark,
            demo,
            file,
        }: Opts,
    ) -> Result<()> {
        let queries = if demo {
            script::demo()
        } else if let Some(file) = file {
            let f = File::open(&file)
                .with_context(|| format!("Error opening query file {}", file.display()))?;
            script::parse(BufReader::new(f), mark)
                .with_context(|| format!("Error reading queries from {}", file.display()))?
        } else {
            script::parse(io::stdin().lock(), mark).context("Error reading queries from stdin")?
        };

        let mut dict = RangeDict::<u64, ListAttribute<String>>::new();
        let mut out = io::stdout().lock();

        for (i, query) in queries.into_iter().enumerate() {
            let Query {
                line,
                begin,
                end,
                entire: entire_here,
                tag,
            } = query;
            let _s = tracing::error_span!("query", line, index = i + 1).entered();

            let mode = match (entire || entire_here, scoped) {
                (false, _) => Mode::Window,
                (true, false) => Mode::Entire,
                (true, true) => Mode::EntireScoped,
            };

            let segments = dict
                .query_with(begin, end, mode)
                .with_context(|| format!("Invalid query on line {line}"))?;

            for seg in segments {
                match tag {
                    Tag::Label(ref label) => seg.attr.push(label.clone()),
                    Tag::Window => seg.attr.push(if seg.in_range { "in" } else { "out" }.into()),
                    Tag::Nothing => (),
                }

                let flag = match (mode.is_entire(), seg.in_range) {
                    (false, _) => "",
                    (true, true) => " in",
                    (true, false) => " out",
                };

                writeln!(out, "{}-{}:{}{flag}", seg.begin, seg.end, seg.attr)
                    .context("Error writing output")?;
            }

            writeln!(out, "---").context("Error writing output")?;
        }

        tracing::debug!(ranges = dict.len(), "Done");

        Ok(())
    }
}

mod script {
    use std::io::BufRead;

    use anyhow::{bail, Context, Result};

    /// Default tagging applied to queries that do not name a label
    #[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
    pub enum Mark {
        /// Tag with the 1-based number of the query
        Query,
        /// Tag with `in` or `out` depending on the queried window
        Window,
        /// Leave attributes untouched
        None,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Tag {
        Label(String),
        Window,
        Nothing,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Query {
        pub line: usize,
        pub begin: Option<u64>,
        pub end: Option<u64>,
        pub entire: bool,
        pub tag: Tag,
    }

    fn parse_key(s: &str) -> Result<Option<u64>> {
        if s == "-" {
            return Ok(None);
        }

        let key = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16)
        } else {
            s.parse()
        };

        key.map(Some)
            .with_context(|| format!("Invalid key {s:?}"))
    }

    fn parse_line(line: usize, text: &str, mark: Mark, index: usize) -> Result<Option<Query>> {
        let text = text.trim();
        if text.is_empty() || text.starts_with('#') {
            return Ok(None);
        }

        let mut words = text.split_whitespace();
        let (Some(begin), Some(end)) = (words.next(), words.next()) else {
            bail!("Expected BEGIN and END, got {text:?}");
        };

        let mut query = Query {
            line,
            begin: parse_key(begin)?,
            end: parse_key(end)?,
            entire: false,
            tag: match mark {
                Mark::Query => Tag::Label(index.to_string()),
                Mark::Window => Tag::Window,
                Mark::None => Tag::Nothing,
            },
        };

        for word in words {
            if word == "entire" {
                query.entire = true;
            } else if let Some(label) = word.strip_prefix('@') {
                query.tag = Tag::Label(label.into());
            } else {
                bail!("Unexpected {word:?}");
            }
        }

        Ok(Some(query))
    }

    pub fn parse(input: impl BufRead, mark: Mark) -> Result<Vec<Query>> {
        let mut queries = vec![];

        for (i, text) in input.lines().enumerate() {
            let line = i + 1;
            let text = text.with_context(|| format!("Error reading line {line}"))?;

            if let Some(query) = parse_line(line, &text, mark, queries.len() + 1)
                .with_context(|| format!("Syntax error on line {line}"))?
            {
                queries.push(query);
            }
        }

        Ok(queries)
    }

    /// The demonstration sequence: two tagging passes in entire mode, then a
    /// run of overlapping windows that only print
    pub fn demo() -> Vec<Query> {
        let tagged = [(20, 500, Tag::Label("hoge".into())), (545, 600, Tag::Window)];
        let windows = [
            (500, 520),
            (510, 530),
            (10, 15),
            (15, 530),
            (15, 530),
            (15, 529),
            (15, 530),
            (5, 610),
        ];

        tagged
            .into_iter()
            .map(|(begin, end, tag)| (begin, end, true, tag))
            .chain(
                windows
                    .into_iter()
                    .map(|(begin, end)| (begin, end, false, Tag::Nothing)),
            )
            .enumerate()
            .map(|(i, (begin, end, entire, tag))| Query {
                line: i + 1,
                begin: Some(begin),
                end: Some(end),
                entire,
                tag,
            })
            .collect()
    }

}
