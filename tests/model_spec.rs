use std::io::Write as _;
use std::path::PathBuf;

use bioprov::models::*;
use bioprov::Error;
use speculate2::speculate;

fn write_fasta(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("assembly.fasta");
    let mut f = std::fs::File::create(&path).expect("Failed to create fasta");
    writeln!(f, ">seq1").expect("Failed to write fasta");
    writeln!(f, "ATGCCCGGG").expect("Failed to write fasta");
    writeln!(f, "ATGAAATTT").expect("Failed to write fasta");
    path
}

speculate! {
    describe "program" {
        describe "cmd" {
            it "concatenates name and parameter values in insertion order" {
                let mut program = Program::new("grep");
                program.add_parameters(["-c", "'ATG'", "genome.fasta"].map(Parameter::from));

                assert_eq!(program.cmd(), "grep -c 'ATG' genome.fasta");
            }

            it "is just the name when there are no parameters" {
                assert_eq!(Program::new("ls").cmd(), "ls");
            }

            it "reflects added parameters immediately" {
                let mut program = Program::new("echo");
                assert_eq!(program.cmd(), "echo");

                program.add_parameter(Parameter::new("hello"));
                assert_eq!(program.cmd(), "echo hello");

                program.add_parameter(Parameter::new("world"));
                assert_eq!(program.cmd(), "echo hello world");
            }

            it "keeps duplicate parameters and their order" {
                let mut program = Program::new("cat");
                program.add_parameters(["a.txt", "a.txt"].map(Parameter::from));
                assert_eq!(program.cmd(), "cat a.txt a.txt");
            }
        }

        describe "run" {
            it "records a successful run with captured stdout" {
                let mut program = Program::new("echo");
                program.add_parameter(Parameter::new("hello"));

                let run = program.run().expect("Failed to run echo");
                assert_eq!(run.id, "1");
                assert_eq!(run.status, RunStatus::Success);
                assert_eq!(run.stdout, "hello\n");
                assert!(run.stderr.is_empty());
                assert!(run.end_time.is_some());
            }

            it "records a nonzero exit as a failed run, not an error" {
                let mut program = Program::new("sh");
                program.add_parameters(["-c", "echo oops >&2; exit 3"].map(Parameter::from));

                let run = program.run().expect("run() should not fail on nonzero exit");
                assert_eq!(run.status, RunStatus::Failure);
                assert_eq!(run.stderr, "oops\n");
                assert_eq!(program.runs().len(), 1);
            }

            it "assigns strictly increasing sequential ids" {
                let mut program = Program::new("true");
                program.run().expect("Failed to run");
                program.run().expect("Failed to run");

                let ids: Vec<&str> = program.runs().keys().map(String::as_str).collect();
                assert_eq!(ids, ["1", "2"]);
                assert_eq!(program.get_run("2").expect("run 2 missing").id, "2");
            }

            it "fails with a dispatch error when the executable does not exist" {
                let mut program = Program::new("definitely-not-a-real-binary-2f9c");
                let err = program.run().expect_err("dispatch should fail");

                assert!(matches!(err, Error::ExecutionDispatch { .. }));
                assert!(program.runs().is_empty());
            }

            it "fails run lookup for an unknown id" {
                let program = Program::new("true");
                let err = program.get_run("1").expect_err("lookup should fail");
                assert!(matches!(err, Error::NotFound { .. }));
            }
        }

        describe "raw shell mode" {
            before {
                let dir = tempfile::tempdir().expect("Failed to create tempdir");
                let fasta = write_fasta(&dir);
            }

            it "lets the shell strip quoting, so grep counts matches" {
                let mut grep = Program::new("grep");
                grep.shell = true;
                grep.add_parameters(["-c", "'ATG'"].map(Parameter::from));
                grep.add_parameter(Parameter::new(fasta.to_string_lossy()));

                assert_eq!(grep.cmd(), format!("grep -c 'ATG' {}", fasta.display()));

                let run = grep.run().expect("Failed to run grep");
                assert_eq!(run.status, RunStatus::Success);
                assert_eq!(run.stdout, "2\n");
            }

            it "records grep's no-match exit code 1 as a completed failed run" {
                let mut grep = Program::new("grep");
                grep.shell = true;
                grep.add_parameters(["-c", "'ZZZZZ'"].map(Parameter::from));
                grep.add_parameter(Parameter::new(fasta.to_string_lossy()));

                let run = grep.run().expect("no-match must not raise");
                assert_eq!(run.status, RunStatus::Failure);
                assert_eq!(run.stdout, "0\n");
            }

            it "honors redirection embedded in a parameter" {
                let out = dir.path().join("out.txt");
                let mut program = Program::new("echo");
                program.shell = true;
                program.add_parameter(Parameter::new("redirected"));
                program.add_parameter(Parameter::new(format!("> {}", out.display())));

                let run = program.run().expect("Failed to run");
                assert_eq!(run.status, RunStatus::Success);
                assert!(run.stdout.is_empty());
                assert_eq!(
                    std::fs::read_to_string(&out).expect("Failed to read redirect target"),
                    "redirected\n"
                );
            }
        }
    }

    describe "sample" {
        before {
            let mut sample = Sample::new("S1");
        }

        describe "add_files" {
            it "keys files by tag" {
                sample.add_files([
                    File::new("/data/assembly.fasta", Some("assembly".to_string())),
                    File::new("/data/reads.fastq", None),
                ]).expect("Failed to add files");

                assert_eq!(sample.files.len(), 2);
                assert_eq!(
                    sample.file("assembly").expect("missing file").path,
                    PathBuf::from("/data/assembly.fasta")
                );
                assert!(sample.files.contains_key("reads"));
            }

            it "rejects a duplicate tag and leaves the mapping unchanged" {
                sample.add_file(File::new("/data/a.fasta", Some("assembly".to_string())))
                    .expect("Failed to add file");

                let err = sample.add_files([
                    File::new("/data/other.txt", Some("notes".to_string())),
                    File::new("/data/b.fasta", Some("assembly".to_string())),
                ]).expect_err("duplicate tag must fail");

                assert!(matches!(err, Error::DuplicateKey { .. }));
                assert_eq!(sample.files.len(), 1);
                assert_eq!(
                    sample.file("assembly").expect("missing file").path,
                    PathBuf::from("/data/a.fasta")
                );
            }

            it "rejects duplicates within a single batch" {
                let err = sample.add_files([
                    File::new("/data/a.txt", Some("t".to_string())),
                    File::new("/data/b.txt", Some("t".to_string())),
                ]).expect_err("intra-batch duplicate must fail");

                assert!(matches!(err, Error::DuplicateKey { .. }));
                assert!(sample.files.is_empty());
            }
        }

        describe "add_programs" {
            it "keys programs by name and rejects collisions" {
                sample.add_program(Program::new("prodigal")).expect("Failed to add program");

                let err = sample.add_program(Program::new("prodigal"))
                    .expect_err("duplicate name must fail");
                assert!(matches!(err, Error::DuplicateKey { .. }));
                assert_eq!(sample.programs.len(), 1);
            }
        }

        describe "lookups" {
            it "fails with NotFound for absent keys" {
                assert!(matches!(
                    sample.file("nope").expect_err("lookup should fail"),
                    Error::NotFound { .. }
                ));
                assert!(matches!(
                    sample.program("nope").expect_err("lookup should fail"),
                    Error::NotFound { .. }
                ));
            }
        }

        describe "attributes" {
            it "holds tagged scalar values" {
                sample.attributes.insert("species".to_string(), AttributeValue::from("E. coli"));
                sample.attributes.insert("depth".to_string(), AttributeValue::from(42i64));
                sample.attributes.insert("gc".to_string(), AttributeValue::from(0.51));
                sample.attributes.insert("paired".to_string(), AttributeValue::from(true));

                assert_eq!(sample.attributes.len(), 4);
                assert_eq!(
                    sample.attributes.get("depth"),
                    Some(&AttributeValue::Int(42))
                );
            }
        }
    }

    describe "project" {
        before {
            let mut project = Project::new("bioprov_tutorial");
        }

        it "looks samples up by name" {
            project.add_sample(Sample::new("S1")).expect("Failed to add sample");

            assert_eq!(project.len(), 1);
            assert_eq!(project.sample("S1").expect("missing sample").name, "S1");
            assert!(matches!(
                project.sample("S2").expect_err("lookup should fail"),
                Error::NotFound { .. }
            ));
        }

        it "rejects duplicate sample names" {
            project.add_sample(Sample::new("S1")).expect("Failed to add sample");
            let err = project.add_sample(Sample::new("S1")).expect_err("duplicate must fail");
            assert!(matches!(err, Error::DuplicateKey { .. }));
        }

        it "holds project-level files with the same collision policy" {
            project.add_file(File::new("/data/sheet.tsv", Some("sheet".to_string())))
                .expect("Failed to add file");

            let err = project.add_files([
                File::new("/data/other.tsv", Some("sheet".to_string())),
            ]).expect_err("duplicate tag must fail");

            assert!(matches!(err, Error::DuplicateKey { .. }));
            assert_eq!(project.files.len(), 1);
        }
    }

    describe "preset program" {
        before {
            let mut sample = Sample::new("S1");
            sample.add_files([
                File::new("/data/assembly.fasta", Some("assembly".to_string())),
                File::new("/data/reads.fastq", Some("reads".to_string())),
            ]).expect("Failed to add files");
        }

        it "appends resolved input paths in tag order" {
            let preset = PresetProgram::new("seqstats")
                .with_params([Parameter::new("-v")])
                .with_input_tags(["reads", "assembly"]);

            let program = preset.instantiate(&sample).expect("Failed to instantiate");
            assert_eq!(
                program.cmd(),
                "seqstats -v /data/reads.fastq /data/assembly.fasta"
            );
        }

        it "fails with NotFound for a missing input tag" {
            let preset = PresetProgram::new("seqstats").with_input_tags(["annotation"]);
            let err = preset.instantiate(&sample).expect_err("missing tag must fail");
            assert!(matches!(err, Error::NotFound { .. }));
        }

        it "carries the shell flag onto the instantiated program" {
            let preset = PresetProgram::new("seqstats").with_shell(true);
            let program = preset.instantiate(&sample).expect("Failed to instantiate");
            assert!(program.shell);
        }
    }

    describe "file" {
        it "derives its directory from the path" {
            let file = File::new("/data/samples/assembly.fasta", None);
            assert_eq!(file.directory(), Some(std::path::Path::new("/data/samples")));
        }

        it "does not require the path to exist" {
            let file = File::new("/nowhere/at/all.txt", None);
            assert!(!file.exists());
        }
    }
}
