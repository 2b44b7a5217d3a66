use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use drawreg::{
    Config,
    storage::{Compiler, Typesetter, typeset},
};
use tracing::instrument;

use super::{generate::Generate, terminal::Colorize};

#[derive(Debug, Clone, Parser)]
#[command(about = "Render the lists, then compile the report sources into PDFs")]
pub struct Build {
    #[command(flatten)]
    generate: Generate,

    /// Folder for the compiled PDFs [default: <DOCUMENTS_DIR>]
    #[arg(long, value_name = "DIR")]
    result_dir: Option<PathBuf>,

    /// Folder for auxiliary compiler files
    #[arg(long, value_name = "DIR", default_value = "build")]
    build_dir: PathBuf,

    /// Report sources to compile, overriding the configuration
    #[arg(long = "tex", value_name = "FILE")]
    sources: Vec<PathBuf>,
}

impl Build {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, mut config: Config) -> anyhow::Result<()> {
        let compiler = Compiler::new(config.compiler.clone(), config.runs);
        self.run_with(&mut config, &compiler)
    }

    fn run_with(&self, config: &mut Config, typesetter: &impl Typesetter) -> anyhow::Result<()> {
        self.generate.render(config)?;

        let sources = if self.sources.is_empty() {
            &config.reports
        } else {
            &self.sources
        };
        if sources.is_empty() {
            tracing::warn!("No report sources configured, nothing to compile");
            return Ok(());
        }

        let result_dir = self.result_dir();
        let outputs = typeset::build(typesetter, sources, result_dir, &self.build_dir)
            .context("Failed to build reports")?;

        for pdf in outputs.iter().filter_map(|output| output.pdf.as_ref()) {
            println!("{} {}", "Built".success(), pdf.display());
        }
        println!("Build completed successfully");
        Ok(())
    }

    fn result_dir(&self) -> &Path {
        self.result_dir
            .as_deref()
            .unwrap_or_else(|| self.generate.documents_dir())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use drawreg::storage::TypesetError;
    use tempfile::TempDir;

    use super::*;

    struct FakeCompiler;

    impl Typesetter for FakeCompiler {
        fn compile(&self, source: &Path) -> Result<(), TypesetError> {
            fs::write(source.with_extension("pdf"), "").unwrap();
            fs::write(source.with_extension("log"), "").unwrap();
            Ok(())
        }
    }

    struct FailingCompiler;

    impl Typesetter for FailingCompiler {
        fn compile(&self, source: &Path) -> Result<(), TypesetError> {
            Err(TypesetError::Failed {
                file: source.to_path_buf(),
                status: "exit status: 1".to_string(),
            })
        }
    }

    fn arg(path: &Path) -> String {
        path.to_str().unwrap().to_string()
    }

    fn setup(tmp: &TempDir) -> (PathBuf, PathBuf) {
        let docs = tmp.path().join("docs");
        let reports = tmp.path().join("reports");
        fs::create_dir(&docs).unwrap();
        fs::create_dir(&reports).unwrap();
        fs::write(docs.join("AQ1-00-x-y-1102.pdf"), "").unwrap();
        let source = reports.join("report_for_client.tex");
        fs::write(&source, "").unwrap();
        (docs, source)
    }

    #[test]
    fn pdf_lands_next_to_documents_by_default() {
        let tmp = TempDir::new().unwrap();
        let (docs, source) = setup(&tmp);
        let output = tmp.path().join("output");
        let build_dir = tmp.path().join("build");

        let command = Build::try_parse_from([
            "build",
            "--documents-dir",
            arg(&docs).as_str(),
            "--output-dir",
            arg(&output).as_str(),
            "--build-dir",
            arg(&build_dir).as_str(),
            "--tex",
            arg(&source).as_str(),
        ])
        .unwrap();
        command
            .run_with(&mut Config::default(), &FakeCompiler)
            .unwrap();

        assert!(output.join("document_list_for_client.tex").exists());
        assert!(docs.join("report_for_client.pdf").exists());
        assert!(build_dir.join("report_for_client.log").exists());
    }

    #[test]
    fn sources_come_from_config() {
        let tmp = TempDir::new().unwrap();
        let (docs, source) = setup(&tmp);
        let result = tmp.path().join("result");

        let command = Build::try_parse_from([
            "build",
            "--documents-dir",
            arg(&docs).as_str(),
            "--output-dir",
            arg(&tmp.path().join("output")).as_str(),
            "--result-dir",
            arg(&result).as_str(),
            "--build-dir",
            arg(&tmp.path().join("build")).as_str(),
        ])
        .unwrap();
        let mut config = Config::default();
        config.reports.push(source);
        command.run_with(&mut config, &FakeCompiler).unwrap();

        assert!(result.join("report_for_client.pdf").exists());
    }

    #[test]
    fn compiler_failure_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let (docs, source) = setup(&tmp);

        let command = Build::try_parse_from([
            "build",
            "--documents-dir",
            arg(&docs).as_str(),
            "--output-dir",
            arg(&tmp.path().join("output")).as_str(),
            "--tex",
            arg(&source).as_str(),
        ])
        .unwrap();
        let error = command
            .run_with(&mut Config::default(), &FailingCompiler)
            .unwrap_err();
        assert!(format!("{error:#}").contains("report_for_client.tex"));
    }
}
