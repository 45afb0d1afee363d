//! The naming pipeline: template → split → translate → normalize →
//! extension case → substitutions → sanitize.

use crate::candidate::RenameCandidate;
use crate::error::RenameError;
use crate::name::{is_usable_name, split_name_ext};
use crate::normalize::{apply_ext_case, normalize_stem, ExtCase, NormalizeOptions};
use crate::sanitize::{sanitize_filename, SanitizeMode};
use crate::substitute::Substitutions;
use crate::template::Template;
use crate::translate::Translation;

/// Everything that shapes a computed name apart from the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingOptions {
    pub normalize: NormalizeOptions,
    pub ext_case: ExtCase,
    pub sanitize: bool,
    pub sanitize_mode: SanitizeMode,
    pub keep_ext: bool,
    /// Zero-pad width for collision counters.
    pub pad: usize,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            normalize: NormalizeOptions::default(),
            ext_case: ExtCase::Keep,
            sanitize: true,
            sanitize_mode: SanitizeMode::Drop,
            keep_ext: false,
            pad: 2,
        }
    }
}

pub struct NamePipeline {
    template: Template,
    options: NamingOptions,
    substitutions: Substitutions,
    translation: Translation,
}

impl NamePipeline {
    pub fn new(template: Template, options: NamingOptions) -> Self {
        Self {
            template,
            options,
            substitutions: Substitutions::default(),
            translation: Translation::disabled(),
        }
    }

    #[must_use]
    pub fn with_substitutions(mut self, substitutions: Substitutions) -> Self {
        self.substitutions = substitutions;
        self
    }

    #[must_use]
    pub fn with_translation(mut self, translation: Translation) -> Self {
        self.translation = translation;
        self
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn options(&self) -> &NamingOptions {
        &self.options
    }

    /// Compute the new name for `candidate`, optionally binding `{counter}`.
    ///
    /// A failed translation keeps the untranslated stem and logs a warning.
    pub fn compute(
        &self,
        candidate: &RenameCandidate,
        counter: Option<u32>,
    ) -> Result<String, RenameError> {
        let rendered =
            self.template
                .render(candidate, counter, self.options.pad, self.options.keep_ext)?;
        let (stem, ext) = split_name_ext(&rendered);

        let stem = match self.translation.translate(stem) {
            Ok(translated) => translated,
            Err(e) => {
                let e = RenameError::from(e);
                tracing::warn!(
                    "{}: {}, keeping '{}'",
                    candidate.path.display(),
                    e,
                    stem
                );
                stem.to_string()
            },
        };

        let stem = normalize_stem(&stem, &self.options.normalize);
        let name = format!("{stem}{}", apply_ext_case(ext, self.options.ext_case));
        let name = self.substitutions.apply(&name);
        let name = if self.options.sanitize {
            sanitize_filename(&name, self.options.sanitize_mode)
        } else {
            name
        };

        if is_usable_name(&name) {
            Ok(name)
        } else {
            Err(RenameError::InvalidName { name })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Timestamps;
    use crate::normalize::CaseMode;
    use crate::translate::{TranslateMode, TranslationError, Translator};
    use chrono::{Local, TimeZone};

    fn candidate(path: &str) -> RenameCandidate {
        let t = Local.with_ymd_and_hms(2024, 3, 5, 12, 34, 56).unwrap();
        RenameCandidate::new(
            path,
            Timestamps {
                created: t,
                modified: t,
            },
            false,
        )
    }

    fn pipeline(template: &str, options: NamingOptions) -> NamePipeline {
        NamePipeline::new(Template::parse(template), options)
    }

    #[test]
    fn test_end_to_end_name() {
        let options = NamingOptions {
            ext_case: ExtCase::Lower,
            ..NamingOptions::default()
        };
        let p = pipeline("{modified:%Y-%m-%d} {stem}{ext}", options);
        let name = p
            .compute(&candidate("/r/docs/my_file \"draft\"?.TXT"), None)
            .unwrap();
        assert_eq!(name, "2024-03-05 My File Draft.txt");
    }

    #[test]
    fn test_substitution_sees_normalized_text() {
        let subs = Substitutions::new(vec![("My File".into(), "Doc".into())], &[]).unwrap();
        let p = pipeline("{stem}{ext}", NamingOptions::default()).with_substitutions(subs);
        assert_eq!(p.compute(&candidate("/r/my_file.txt"), None).unwrap(), "Doc.txt");
    }

    #[test]
    fn test_substitution_output_is_sanitized() {
        let subs = Substitutions::new(vec![("A".into(), "a:b".into())], &[]).unwrap();
        let p = pipeline("{stem}{ext}", NamingOptions::default()).with_substitutions(subs);
        assert_eq!(p.compute(&candidate("/r/a.txt"), None).unwrap(), "ab.txt");
    }

    #[test]
    fn test_no_sanitize_keeps_characters() {
        let options = NamingOptions {
            sanitize: false,
            normalize: NormalizeOptions {
                case_mode: CaseMode::Keep,
                drop_symbols: false,
                ..NormalizeOptions::default()
            },
            ..NamingOptions::default()
        };
        let p = pipeline("{stem}:{counter}{ext}", options);
        assert_eq!(p.compute(&candidate("/r/a.txt"), None).unwrap(), "a:1.txt");
    }

    #[test]
    fn test_empty_result_is_invalid() {
        let p = pipeline("{stem}", NamingOptions::default());
        let err = p.compute(&candidate("/r/???"), None).unwrap_err();
        assert!(matches!(err, RenameError::InvalidName { .. }));
    }

    #[test]
    fn test_counter_is_padded() {
        let p = pipeline("{stem} {counter}{ext}", NamingOptions::default());
        let c = candidate("/r/photo.jpg");
        assert_eq!(p.compute(&c, None).unwrap(), "Photo 1.jpg");
        assert_eq!(p.compute(&c, Some(3)).unwrap(), "Photo 03.jpg");
    }

    struct Prefixing;

    impl Translator for Prefixing {
        fn translate(&self, text: &str, _: &str, _: &str) -> Result<String, TranslationError> {
            Ok(format!("translated {text}"))
        }
    }

    struct Broken;

    impl Translator for Broken {
        fn translate(&self, _: &str, _: &str, _: &str) -> Result<String, TranslationError> {
            Err(TranslationError::InvalidResponse("down".into()))
        }
    }

    #[test]
    fn test_translation_runs_before_normalization() {
        let translation = Translation::new(Box::new(Prefixing), "th-en".parse::<TranslateMode>().unwrap());
        let p = pipeline("{stem}{ext}", NamingOptions::default()).with_translation(translation);
        assert_eq!(
            p.compute(&candidate("/r/report_q1.pdf"), None).unwrap(),
            "Translated Report Q1.pdf"
        );
    }

    #[test]
    fn test_translation_failure_falls_back() {
        let translation = Translation::new(Box::new(Broken), "th-en".parse::<TranslateMode>().unwrap());
        let p = pipeline("{stem}{ext}", NamingOptions::default()).with_translation(translation);
        assert_eq!(
            p.compute(&candidate("/r/report_q1.pdf"), None).unwrap(),
            "Report Q1.pdf"
        );
    }

    #[test]
    fn test_translation_error_is_per_candidate() {
        let e = RenameError::from(TranslationError::InvalidResponse("down".into()));
        assert_eq!(
            e.to_string(),
            "translation failed: unexpected translation response: down"
        );
        assert!(!e.is_structural());
    }
}
