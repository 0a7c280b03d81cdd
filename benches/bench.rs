use criterion::{criterion_group, criterion_main, Criterion};
use std::io::Write;
use std::path::PathBuf;
use suricata_log::prelude::*;

const NB_EVENTS: usize = 50_000;

fn generate_eve(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("eve.json");
    let mut f = std::io::BufWriter::new(std::fs::File::create(&path).expect("Failed to create"));
    let ports = [443, 53, 587, 465, 25, 137, 8080, 88, 80, 389];
    for n in 0..NB_EVENTS {
        let line = match n % 4 {
            0 => format!(
                r#"{{"timestamp":"2022-02-08T16:32:14.900292+0000","event_type":"flow","proto":"TCP","src_ip":"10.2.8.102","dest_ip":"52.96.222.130","dest_port":{}}}"#,
                ports[(n / 4) % ports.len()]
            ),
            1 => r#"{"timestamp":"2022-02-08T16:32:15.100000+0000","event_type":"dns","dns":{"type":"answer","rrname":"nope.example","rcode":"NXDOMAIN"}}"#.to_owned(),
            2 => r#"{"timestamp":"2022-02-08T16:32:16.200000+0000","event_type":"http","http":{"hostname":"www.msftncsi.com","http_user_agent":"Microsoft NCSI"}}"#.to_owned(),
            _ => r#"{"timestamp":"2022-02-08T16:32:20.491791+0000","event_type":"alert","alert":{"signature":"SURICATA SMTP invalid reply","severity":3},"payload":"TV0NCg=="}"#.to_owned(),
        };
        writeln!(f, "{}", line).expect("Failed to write");
    }
    path
}

fn bench_flow_report(c: &mut Criterion) {
    let _ = env_logger::try_init();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = generate_eve(&dir);

    let benchmark = criterion::Benchmark::new("flow_report", move |b| {
        let reader = EveReader::new(vec![path.clone()]);
        let cutoff = TimestampFilter::new(*DEFAULT_TIMESTAMP_10Y_AGO);

        b.iter(|| {
            let mut report = FlowProtoReport::new();
            let observed = ingest_all(reader.accepted(&cutoff), &mut report, &CancelToken::default())
                .expect("Failed to ingest");

            assert_eq!(observed, NB_EVENTS);
            assert_eq!(report.len(), 10);
        })
    });

    c.bench(
        "eve",
        benchmark
            .sample_size(10)
            .measurement_time(std::time::Duration::from_secs(15)),
    );
}

criterion_group!(benches, bench_flow_report);

//
// Benchmark: RUST_LOG=suricata_log=info cargo bench --bench benches -- --verbose
criterion_main!(benches);
