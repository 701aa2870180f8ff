use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use gcoord_core::models::{Interval, NamedInterval, SequenceDictionary};
use gcoord_liftover::{Chain, LiftOver, LiftOverError};

use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

#[fixture]
fn chain_path() -> PathBuf {
    std::env::current_dir()
        .unwrap()
        .join("../tests/data/liftover/test.over.chain")
}

#[fixture]
fn lift(chain_path: PathBuf) -> LiftOver {
    LiftOver::from_file(chain_path).unwrap()
}

#[rstest]
#[case(Interval::new("chr1", 16776377, 16776452), Some((Interval::new("chr1", 16903790, 16903865), false)))]
#[case(Interval::new("chr1", 2479704, 2479833), Some((Interval::new("chr1", 2494585, 2494714), true)))]
#[case(Interval::new("chr3", 50911035, 50911051), None)]
#[case(Interval::new("chr2", 1000, 2000), None)]
fn test_lift_over_fixed_points(
    lift: LiftOver,
    #[case] query: Interval,
    #[case] expected: Option<(Interval, bool)>,
) {
    let lifted = lift
        .lift_over(&query)
        .map(|l| (l.interval, l.strand_flipped));
    assert_eq!(lifted, expected);
}

#[rstest]
fn test_higher_score_wins_over_overlapping_chain(lift: LiftOver) {
    let lifted = lift
        .lift_over(&Interval::new("chr1", 16776377, 16776452))
        .unwrap();
    assert_eq!(lifted.chain_id, 1);

    // chain 4 starts here
    let lifted = lift
        .lift_over(&Interval::new("chr1", 16776001, 16776010))
        .unwrap();
    assert_eq!(lifted.chain_id, 1);

    let all = lift.diagnostic_liftover(&Interval::new("chr1", 16776001, 16776010));
    let ids: Vec<u64> = all.iter().map(|p| p.chain_id).collect();
    assert_eq!(ids, vec![1, 4]);
}

#[rstest]
fn test_named_lift_flips_strand(lift: LiftOver) {
    let query = NamedInterval::new("chr1", 2479704, 2479833).with_name("probe");
    let lifted = lift.lift_over_named(&query).unwrap();
    assert_eq!(lifted.interval(), &Interval::new("chr1", 2494585, 2494714));
    assert!(lifted.is_negative_strand());
    assert_eq!(lifted.name(), Some("probe"));
}

#[rstest]
fn test_diagnostics_explain_gap(lift: LiftOver) {
    let partials = lift.diagnostic_liftover(&Interval::new("chr3", 50911035, 50911051));
    assert_eq!(partials.len(), 2);

    let gap = &partials[0];
    assert!(gap.is_gap);
    assert_eq!(gap.chain_id, 3);
    assert_eq!(gap.ref_interval, Interval::new("chr3", 50911035, 50911040));
    assert!((gap.fraction - 6.0 / 17.0).abs() < 1e-12);

    let block = &partials[1];
    assert!(!block.is_gap);
    assert_eq!(block.block_index, 1);
    assert_eq!(block.alt_interval, Some(Interval::new("chr3", 50931031, 50931041)));
    assert!((block.fraction - 11.0 / 17.0).abs() < 1e-12);
}

#[rstest]
fn test_config_lowers_min_match() {
    let cfg = std::env::current_dir()
        .unwrap()
        .join("../tests/data/liftover/liftover.toml");
    let lift = LiftOver::from_config(cfg).unwrap();
    assert_eq!(lift.min_match(), 0.6);

    let lifted = lift
        .lift_over(&Interval::new("chr3", 50911035, 50911051))
        .unwrap();
    assert_eq!(lifted.interval, Interval::new("chr3", 50931031, 50931041));
}

#[rstest]
fn test_validate_to_sequences(lift: LiftOver) {
    let hg19 = SequenceDictionary::try_from(vec![
        ("chr1".to_string(), 249250621),
        ("chr3".to_string(), 198022430),
        ("chr5".to_string(), 180915260),
    ])
    .unwrap();
    assert!(lift.validate_to_sequences(&hg19).is_ok());

    let no_chr5 = SequenceDictionary::try_from(vec![
        ("chr1".to_string(), 249250621),
        ("chr3".to_string(), 198022430),
    ])
    .unwrap();
    assert!(matches!(
        lift.validate_to_sequences(&no_chr5),
        Err(LiftOverError::DictionaryMismatch(_))
    ));
}

#[rstest]
fn test_write_and_reload_by_id(chain_path: PathBuf) -> anyhow::Result<()> {
    let chains = Chain::load_chains(&chain_path)?;
    assert_eq!(chains.len(), 4);

    let dir = tempfile::tempdir()?;
    let out_path = dir.path().join("roundtrip.over.chain");
    {
        let mut out = BufWriter::new(File::create(&out_path)?);
        Chain::write_chains(&chains, &mut out)?;
    }

    let original: HashMap<u64, Chain> = Chain::by_id(chains);
    let reloaded: HashMap<u64, Chain> = Chain::by_id(Chain::load_chains(&out_path)?);
    assert_eq!(original, reloaded);
    Ok(())
}
