use crate::features::Feature;
use std::fs::OpenOptions;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::time::Duration;

/// Summary of one train-and-evaluate run.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    pub features: Vec<Feature>,
    pub weights: Vec<f64>,
    /// Fraction of the problems used for training.
    pub split: f64,
    pub training_problems: usize,
    pub test_problems: usize,
    pub edit_accuracy: f64,
    pub score_accuracy: f64,
    pub learn_time: Duration,
    pub align_time: Duration,
}

fn join<T: ToString>(items: &[T], separator: &str) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(separator)
}

impl RunReport {
    pub fn print(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Learned weights: {:?}", self.weights)?;
        writeln!(
            out,
            "Split: {} ({} training, {} test problems)",
            self.split, self.training_problems, self.test_problems
        )?;
        writeln!(out, "Learn time: {:?}", self.learn_time)?;
        writeln!(out, "Alignment time: {:?}", self.align_time)?;
        writeln!(out, "Features:")?;
        for feature in &self.features {
            writeln!(out, "\t- {feature}")?;
        }
        writeln!(out, "Total score accuracy: {}", self.score_accuracy)?;
        writeln!(out, "Total edit accuracy: {}", self.edit_accuracy)?;
        Ok(())
    }

    /// `index  features  edit accuracy  score accuracy  learn time  align time  weights`.
    pub fn tsv_line(&self, index: usize) -> String {
        format!(
            "{index}\t{}\t{}\t{}\t{}\t{}\t{}",
            join(&self.features, ","),
            self.edit_accuracy,
            self.score_accuracy,
            self.learn_time.as_secs_f64(),
            self.align_time.as_secs_f64(),
            join(&self.weights, ","),
        )
    }

    /// Appends a line to the log, numbered after the lines already there. Returns the number.
    pub fn append_tsv(&self, path: &Path) -> io::Result<usize> {
        let index = match std::fs::File::open(path) {
            Ok(file) => BufReader::new(file).lines().count(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e),
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", self.tsv_line(index))?;
        Ok(index)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn report() -> RunReport {
        RunReport {
            features: vec![Feature::EditType, Feature::MaxDistance],
            weights: vec![0.5, -0.25],
            split: 0.3,
            training_problems: 3,
            test_problems: 7,
            edit_accuracy: 0.75,
            score_accuracy: 0.9,
            learn_time: Duration::from_millis(1500),
            align_time: Duration::from_millis(250),
        }
    }

    #[test]
    fn tsv_columns() {
        assert_eq!(report().tsv_line(4), "4\tEditType,MaxDistance\t0.75\t0.9\t1.5\t0.25\t0.5,-0.25");
    }

    #[test]
    fn printed_summary_lists_features() {
        let mut out = vec![];
        report().print(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\t- EditType\n\t- MaxDistance\n"));
        assert!(text.contains("Total edit accuracy: 0.75"));
        assert!(text.contains("(3 training, 7 test problems)"));
    }

    #[test]
    fn log_lines_are_numbered() {
        let path = std::env::temp_dir().join(format!("paralign-report-{}.tsv", std::process::id()));
        let _ = std::fs::remove_file(&path);
        assert_eq!(report().append_tsv(&path).unwrap(), 0);
        assert_eq!(report().append_tsv(&path).unwrap(), 1);
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("1\tEditType"));
    }
}
