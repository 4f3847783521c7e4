use pretty_assertions::assert_eq;
use tests::{builder, directory, prelude::*, setup, ExecLog};
use weave::{Db, Mapping, Record};

fn teams(log: &ExecLog) -> Db {
    let mut team = Mapping::builder("Team");
    team.identity("id").unwrap();
    team.reference("name");
    team.many_to_many("sponsors", "Sponsor").cascade_on_update();

    let mut sponsor = Mapping::builder("Sponsor");
    sponsor.identity("id").unwrap();

    let mut builder = builder(log);
    builder.register_source(directory("people", 0)).unwrap();
    builder
        .mapping(team.build().unwrap())
        .mapping(sponsor.build().unwrap());
    setup(&builder, log)
}

#[test]
fn unsupported_operations_yield_empty_batches() {
    let log = ExecLog::new();
    let db = teams(&log);

    let binding = &assert_ok!(db.bindings("Team"))[0];
    let generator = binding.generator();
    let sponsors = assert_some!(binding.mapping().property("sponsors"));
    let team = Record::new().with("id", 1);

    let batch = assert_ok!(generator.joins_save(&team, sponsors));
    assert_eq!(batch.command_count(), 0);
    assert_eq!(assert_ok!(batch.execute()), 0);

    let batch = assert_ok!(generator.load_property(&team, sponsors));
    assert_empty!(assert_ok!(batch.execute_dynamic()));

    let batch = assert_ok!(generator.create_storage());
    assert!(batch.is_empty());

    log.assert_empty();
}

#[test]
fn operations_skip_what_a_source_cannot_express() {
    let log = ExecLog::new();
    let db = teams(&log);

    let sponsor = Record::new().with("id", 9);
    let mut team = Record::new()
        .with("id", 1)
        .with("name", "Compilers")
        .with("sponsors", vec![sponsor]);
    assert_ok!(db.save_record("Team", &mut team));

    // Only the entries themselves reach the directory
    let verbs: Vec<_> = log
        .entries()
        .into_iter()
        .map(|entry| entry.command.text)
        .collect();
    assert_eq!(verbs, ["modify", "add", "modify", "add"]);

    assert_empty!(assert_ok!(db.load_property("Team", &team, "sponsors")));
    assert_ok!(db.delete_record("Team", &team));
}
