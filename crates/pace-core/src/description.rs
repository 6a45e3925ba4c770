//! Renders scheduler scripts for (work item, cohort variant) pairs.
use std::fmt::Write as _;

use pace_model::{CallbackAddress, CohortVariant, JobDescription, JobName, JobTemplate, WorkItem};

/// Pure renderer of Slurm batch scripts.
///
/// The only source of nondeterminism is the random job name drawn by [`JobDescriptionBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct JobDescriptionBuilder {
    template: JobTemplate,
}

impl JobDescriptionBuilder {
    pub fn new(template: JobTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &JobTemplate {
        &self.template
    }

    /// Render a description under a freshly generated job name.
    pub fn build(
        &self,
        item: WorkItem,
        variant: CohortVariant,
        callback: &CallbackAddress,
    ) -> JobDescription {
        self.build_named(JobName::generate(), item, variant, callback)
    }

    /// Render a description under the given job name.
    pub fn build_named(
        &self,
        name: JobName,
        item: WorkItem,
        variant: CohortVariant,
        callback: &CallbackAddress,
    ) -> JobDescription {
        let script = self.render(&name, &item, variant, callback);
        JobDescription::new(name, item, variant, script)
    }

    fn render(
        &self,
        name: &JobName,
        item: &WorkItem,
        variant: CohortVariant,
        callback: &CallbackAddress,
    ) -> String {
        let limits = &self.template.limits;
        let mut out = String::with_capacity(512);

        // Writing into a String cannot fail.
        let _ = writeln!(out, "#!/bin/bash");
        let _ = writeln!(out, "#SBATCH --job-name={name}");
        let _ = writeln!(out, "#SBATCH --output={name}.out");
        let _ = writeln!(out, "#SBATCH --err={name}.err");
        let _ = writeln!(out, "#SBATCH --time={}", limits.wall_time_hms());
        let _ = writeln!(out, "#SBATCH --cpus-per-task={}", limits.cpus_per_task);
        let _ = writeln!(out, "#SBATCH --export=NONE");
        let _ = writeln!(out, "#SBATCH --get-user-env=L");
        let _ = writeln!(out, "#SBATCH --mem={}", limits.memory);
        out.push('\n');

        if !self.template.prelude.is_empty() {
            for line in &self.template.prelude {
                let _ = writeln!(out, "{line}");
            }
            out.push('\n');
        }

        let worker = &self.template.worker;
        out.push_str(&worker.program);
        for arg in &worker.args {
            out.push(' ');
            out.push_str(arg);
        }
        let _ = write!(
            out,
            " -t {} -y {variant} -p {} -a {}",
            shell_quote(item.as_str()),
            callback.port,
            callback.host,
        );
        out
    }
}

/// Double-quote a value for bash, escaping the characters that stay special inside double quotes.
fn shell_quote(raw: &str) -> String {
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for c in raw.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_name() -> JobName {
        JobName::parse("ABCDEF0123456789ABCD").unwrap()
    }

    fn item(s: &str) -> WorkItem {
        WorkItem::from_line(s).unwrap()
    }

    #[test]
    fn renders_reference_script() {
        let builder = JobDescriptionBuilder::default();
        let callback = CallbackAddress::new("10.0.0.5", 6000);

        let desc = builder.build_named(fixed_name(), item("geneA"), CohortVariant::new(2011), &callback);

        let expected = "#!/bin/bash\n\
                        #SBATCH --job-name=ABCDEF0123456789ABCD\n\
                        #SBATCH --output=ABCDEF0123456789ABCD.out\n\
                        #SBATCH --err=ABCDEF0123456789ABCD.err\n\
                        #SBATCH --time=01:00:00\n\
                        #SBATCH --cpus-per-task=1\n\
                        #SBATCH --export=NONE\n\
                        #SBATCH --get-user-env=L\n\
                        #SBATCH --mem=10gb\n\
                        \n\
                        module load R\n\
                        \n\
                        Rscript listener.R -t \"geneA\" -y 2011 -p 6000 -a 10.0.0.5";
        assert_eq!(desc.script(), expected);
        assert_eq!(desc.name(), &fixed_name());
        assert_eq!(desc.item().as_str(), "geneA");
        assert_eq!(desc.variant(), CohortVariant::new(2011));
    }

    #[test]
    fn uses_template_limits_and_worker() {
        let mut template = JobTemplate::default();
        template.limits.wall_time_secs = 7_200;
        template.limits.cpus_per_task = 4;
        template.limits.memory = "5gb".into();
        template.prelude.clear();
        template.worker.program = "/opt/bin/worker".into();
        template.worker.args = vec!["--verbose".into()];

        let desc = JobDescriptionBuilder::new(template).build_named(
            fixed_name(),
            item("trait_1"),
            CohortVariant::new(2010),
            &CallbackAddress::new("head-node", 7000),
        );

        assert!(desc.script().contains("#SBATCH --time=02:00:00\n"));
        assert!(desc.script().contains("#SBATCH --cpus-per-task=4\n"));
        assert!(desc.script().contains("#SBATCH --mem=5gb\n"));
        assert!(!desc.script().contains("module load"));
        assert!(desc.script().ends_with(
            "\n/opt/bin/worker --verbose -t \"trait_1\" -y 2010 -p 7000 -a head-node"
        ));
    }

    #[test]
    fn quotes_shell_special_characters() {
        assert_eq!(shell_quote("plain"), "\"plain\"");
        assert_eq!(shell_quote("with space"), "\"with space\"");
        assert_eq!(shell_quote(r#"a"b$c`d\e"#), r#""a\"b\$c\`d\\e""#);
    }

    #[test]
    fn build_draws_a_new_name_each_time() {
        let builder = JobDescriptionBuilder::default();
        let callback = CallbackAddress::new("127.0.0.1", 6000);

        let a = builder.build(item("geneA"), CohortVariant::new(2011), &callback);
        let b = builder.build(item("geneA"), CohortVariant::new(2011), &callback);

        assert_ne!(a.name(), b.name());
        assert!(a.script().contains(&format!("--job-name={}", a.name())));
    }
}
