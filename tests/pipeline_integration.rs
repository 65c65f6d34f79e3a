//! End-to-end transform tests
//!
//! Builds small input tables in a temporary directory, runs the transform
//! and checks the three output files.

use probe_crossmap::core::{run_transform_with, FixedChooser, MergePolicy, ProbeMapError};
use probe_crossmap::{run_transform, ParseError, TransformConfig};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const INTENSITY_HEADER: &str =
    "probe_id\tx\ty\tprobe_type\tprobeset_id\tprobeset_type\tblock\tS1.CEL\tS2.CEL";

const DETAIL_HEADER: &str =
    "probeset_id\tprobe_id\ttype\tgc_count\tprobe_length\tinterrogation_position\tprobe_sequence";

/// Input tables of one run
struct Inputs {
    huex_intensities: String,
    huge_intensities: String,
    comparison: String,
    huex_details: String,
    huge_details: String,
    huex_mps: String,
    huge_mps: String,
}

impl Default for Inputs {
    /// One gene probeset (20001) and one exon probeset (30001) sharing
    /// the sequence of gene probe 501 and exon probe 801
    fn default() -> Self {
        Self {
            huex_intensities: format!(
                "#%chip_type=HuEx-1_0-st\n{}\n801\t5\t6\tpm:st\t30001\tmain\t2\t10.5\t11.25\n802\t5\t7\tpm:st\t30001\tmain\t2\t3\t4\n",
                INTENSITY_HEADER
            ),
            huge_intensities: format!(
                "{}\n501\t1\t2\tpm:st\t20001\tmain\t1\t7.0\t8.5\n502\t1\t3\tpm:st\t20001\tmain\t1\t1\t2\n",
                INTENSITY_HEADER
            ),
            comparison: "#%comparison\n1\tx\t3000\tx\tx\t2000\n".to_string(),
            huex_details: format!(
                "{}\n30001\t801\tpm:st\t12\t25\t13\tACGTACGTACGTACGTACGTACGTA\n30001\t802\tpm:st\t11\t25\t13\tTTTTTTTTTTTTTTTTTTTTTTTTT\n",
                DETAIL_HEADER
            ),
            huge_details: format!(
                "{}\n20001\t501\tpm:st\t12\t25\t13\tACGTACGTACGTACGTACGTACGTA\n20001\t502\tpm:st\t10\t25\t13\tGGGGGGGGGGGGGGGGGGGGGGGGG\n",
                DETAIL_HEADER
            ),
            huex_mps: "probeset_id\ttranscript_cluster_id\tprobeset_list\n3000\t3000\t30001\n"
                .to_string(),
            huge_mps: "probeset_id\ttranscript_cluster_id\tprobeset_list\n2000\t2000\t20001\n"
                .to_string(),
        }
    }
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn setup(inputs: &Inputs) -> (TempDir, TransformConfig) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let mut config = TransformConfig::new(
        write(root, "huex_int.txt", &inputs.huex_intensities),
        write(root, "huge_int.txt", &inputs.huge_intensities),
        write(root, "comparison.txt", &inputs.comparison),
        write(root, "huex_details.txt", &inputs.huex_details),
        write(root, "huge_details.txt", &inputs.huge_details),
        write(root, "huex_mps.txt", &inputs.huex_mps),
        write(root, "huge_mps.txt", &inputs.huge_mps),
        root.join("huex_out.txt"),
        root.join("huge_out.txt"),
    );
    config.manifest_out = root.join("huex_probes.txt");
    config.seed = Some(1);
    (dir, config)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_single_shared_probe() {
    let (_dir, config) = setup(&Inputs::default());
    let stats = run_transform(&config).unwrap();

    assert_eq!(stats.resolve.resolved, 1);
    assert_eq!(stats.resolved_probesets, 1);
    assert_eq!(stats.matching.matched_pairs, 1);
    assert_eq!(stats.matching.rows_written, 1);

    assert_eq!(
        read(&config.huge_out),
        format!("{}\n501\t1\t2\tpm:st\t20001\tmain\t1\t7.0\t8.5\n", INTENSITY_HEADER)
    );
    // Exon intensities under the gene probe and probeset ids
    assert_eq!(
        read(&config.huex_out),
        format!("{}\n501\t5\t6\tpm:st\t20001\tmain\t2\t10.5\t11.25\n", INTENSITY_HEADER)
    );
    assert_eq!(read(&config.manifest_out), "probe_id\n801\n");
}

#[test]
fn test_missing_exon_membership_writes_headers_only() {
    let inputs = Inputs {
        huex_mps: "probeset_id\ttranscript_cluster_id\tprobeset_list\n".to_string(),
        ..Inputs::default()
    };
    let (_dir, config) = setup(&inputs);
    let stats = run_transform(&config).unwrap();

    assert_eq!(stats.resolve.missing_exon_membership, 1);
    assert_eq!(stats.matching.rows_written, 0);
    assert_eq!(read(&config.huge_out), format!("{}\n", INTENSITY_HEADER));
    assert_eq!(read(&config.huex_out), format!("{}\n", INTENSITY_HEADER));
    assert_eq!(read(&config.manifest_out), "probe_id\n");
}

#[test]
fn test_missing_intensity_is_skipped() {
    let inputs = Inputs {
        huex_intensities: format!(
            "{}\n802\t5\t7\tpm:st\t30001\tmain\t2\t3\t4\n",
            INTENSITY_HEADER
        ),
        ..Inputs::default()
    };
    let (_dir, config) = setup(&inputs);
    let stats = run_transform(&config).unwrap();

    assert_eq!(stats.matching.matched_pairs, 1);
    assert_eq!(stats.matching.missing_intensity, 1);
    assert_eq!(stats.matching.rows_written, 0);
    assert_eq!(read(&config.manifest_out), "probe_id\n");
}

#[test]
fn test_tie_break_across_runs() {
    // Gene metaprobeset 2000 compared with 3000 and 3100; only 3000 has probesets
    let inputs = Inputs {
        comparison: "1\tx\t3000\tx\tx\t2000\n2\tx\t3100\tx\tx\t2000\n".to_string(),
        ..Inputs::default()
    };
    let (_dir, config) = setup(&inputs);

    let stats = run_transform_with(&config, &mut FixedChooser(0)).unwrap();
    assert_eq!(stats.resolve.ambiguous, 1);
    assert_eq!(stats.matching.rows_written, 1);

    let stats = run_transform_with(&config, &mut FixedChooser(1)).unwrap();
    assert_eq!(stats.resolve.missing_exon_membership, 1);
    assert_eq!(stats.matching.rows_written, 0);
    assert_eq!(read(&config.manifest_out), "probe_id\n");
}

#[test]
fn test_limit_caps_gene_probesets() {
    let inputs = Inputs {
        huge_mps: "2000\t2000\t20001 20002\n".to_string(),
        huge_details: format!(
            "{}\n20001\t501\tpm:st\t12\t25\t13\tACGTACGTACGTACGTACGTACGTA\n20002\t503\tpm:st\t12\t25\t13\tACGTACGTACGTACGTACGTACGTA\n",
            DETAIL_HEADER
        ),
        huge_intensities: format!(
            "{}\n501\t1\t2\tpm:st\t20001\tmain\t1\t7.0\t8.5\n503\t1\t4\tpm:st\t20002\tmain\t1\t5\t6\n",
            INTENSITY_HEADER
        ),
        ..Inputs::default()
    };

    let (_dir, config) = setup(&inputs);
    let stats = run_transform(&config).unwrap();
    assert_eq!(stats.matching.rows_written, 2);

    let (_dir, mut config) = setup(&inputs);
    config.limit = Some(1);
    let stats = run_transform(&config).unwrap();
    assert_eq!(stats.matching.gene_probesets, 1);
    assert_eq!(stats.matching.rows_written, 1);
    assert_eq!(read(&config.manifest_out), "probe_id\n801\n");
}

#[test]
fn test_union_policy_accumulates_candidates() {
    // Two gene metaprobesets feed probeset 20001 with different exon probesets
    let inputs = Inputs {
        comparison: "1\tx\t3000\tx\tx\t2000\n2\tx\t3100\tx\tx\t2100\n".to_string(),
        huge_mps: "2000\t2000\t20001\n2100\t2100\t20001\n".to_string(),
        huex_mps: "3000\t3000\t30001\n3100\t3100\t31001\n".to_string(),
        ..Inputs::default()
    };

    let (_dir, config) = setup(&inputs);
    let stats = run_transform(&config).unwrap();
    // Last write points 20001 at 31001, which has no details
    assert_eq!(stats.matching.missing_details, 1);
    assert_eq!(stats.matching.rows_written, 0);

    let (_dir, mut config) = setup(&inputs);
    config.merge_policy = MergePolicy::Union;
    let stats = run_transform(&config).unwrap();
    assert_eq!(stats.matching.probeset_pairs, 2);
    assert_eq!(stats.matching.rows_written, 1);
}

#[test]
fn test_gzip_input() {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let (dir, mut config) = setup(&Inputs::default());
    let gz_path = dir.path().join("huge_details.txt.gz");
    let mut encoder = GzEncoder::new(fs::File::create(&gz_path).unwrap(), Compression::default());
    encoder
        .write_all(Inputs::default().huge_details.as_bytes())
        .unwrap();
    encoder.finish().unwrap();
    config.huge_details = gz_path;

    let stats = run_transform(&config).unwrap();
    assert_eq!(stats.matching.rows_written, 1);
}

#[test]
fn test_short_detail_row_is_fatal() {
    let inputs = Inputs {
        huex_details: "30001\t801\tpm:st\n".to_string(),
        ..Inputs::default()
    };
    let (_dir, config) = setup(&inputs);
    let err = run_transform(&config).unwrap_err();
    match &err {
        ProbeMapError::Load { path, source } => {
            assert_eq!(path, &config.huex_details);
            assert!(matches!(source, ParseError::TooFewFields { line: 1, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_load_error_names_file() {
    let inputs = Inputs {
        huex_details: "30001\t801\tpm:st\n".to_string(),
        ..Inputs::default()
    };
    let (_dir, config) = setup(&inputs);
    let err = anyhow::Error::new(run_transform(&config).unwrap_err());
    let message = format!("{:#}", err);

    assert!(message.contains("huex_details.txt"), "{}", message);
    assert_eq!(message.matches("Too few fields").count(), 1, "{}", message);
}

#[test]
fn test_non_numeric_intensity_is_fatal() {
    let inputs = Inputs {
        huge_intensities: format!(
            "{}\n501\t1\t2\tpm:st\t20001\tmain\t1\tn/a\t8.5\n",
            INTENSITY_HEADER
        ),
        ..Inputs::default()
    };
    let (_dir, config) = setup(&inputs);
    let err = run_transform(&config).unwrap_err();
    assert!(matches!(
        err,
        ProbeMapError::Load {
            source: ParseError::InvalidNumber { line: 2, field: "intensity", .. },
            ..
        }
    ));
}

#[test]
fn test_missing_input_file_is_io_error() {
    let (_dir, mut config) = setup(&Inputs::default());
    config.comparison_map = PathBuf::from("/nonexistent/comparison.txt");
    let err = run_transform(&config).unwrap_err();
    assert!(matches!(
        err,
        ProbeMapError::Load { source: ParseError::Io(_), .. }
    ));
}
