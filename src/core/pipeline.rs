use crate::core::encoder::CssEncoder;
use crate::core::plan::BundlePlan;
use crate::domain::model::{CssArtifact, IconFile, IconPair, IconSet, OutputType, RASTER_EXTENSIONS};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::{BundleError, Result};
use std::collections::{BTreeMap, HashMap};
use tokio::task::JoinSet;

/// The bundling pipeline: scans a source tree for icon files, pairs vectors
/// with their raster fallbacks, renders one CSS artifact per requested
/// (type, group) and writes them to the output storage.
pub struct IconPipeline<S: Storage> {
    source: S,
    output: S,
    plan: BundlePlan,
    encoder: CssEncoder,
}

impl<S: Storage> IconPipeline<S> {
    pub fn new<C: ConfigProvider>(source: S, output: S, config: &C) -> Result<Self> {
        let plan = BundlePlan::from_config(config)?;
        let encoder = plan.encoder();
        Ok(Self {
            source,
            output,
            plan,
            encoder,
        })
    }

    pub fn plan(&self) -> &BundlePlan {
        &self.plan
    }

    /// A path qualifies when its name ends with `.<suffix>.<ext>`, or when it
    /// carries an icon extension and sits under a `.<suffix>` directory.
    fn qualifies(&self, path: &str) -> bool {
        let suffix = &self.plan.sources_suffix;
        let name = path.rsplit('/').next().unwrap_or(path);

        let mut extensions: Vec<&str> = RASTER_EXTENSIONS.to_vec();
        extensions.push("svg");

        if extensions
            .iter()
            .any(|ext| name.ends_with(&format!(".{}.{}", suffix, ext)))
        {
            return true;
        }

        let dir_suffix = format!(".{}", suffix);
        let in_suffix_dir = path
            .split('/')
            .rev()
            .skip(1)
            .any(|dir| dir.ends_with(&dir_suffix));
        in_suffix_dir
            && extensions
                .iter()
                .any(|ext| name.ends_with(&format!(".{}", ext)))
    }

    /// Reads every distinct source file once, as independent joined tasks.
    async fn load_contents(&self, set: &mut IconSet) -> Result<()>
    where
        S: Clone + 'static,
    {
        let mut unique: Vec<String> = set
            .vectors
            .iter()
            .chain(set.bitmaps.iter())
            .map(|file| file.filename.clone())
            .collect();
        unique.sort();
        unique.dedup();

        let mut tasks = JoinSet::new();
        for path in unique {
            let storage = self.source.clone();
            tasks.spawn(async move {
                let data = storage.read_file(&path).await.map_err(|err| match err {
                    BundleError::IoError(source) => BundleError::FileReadError {
                        path: path.clone(),
                        source,
                    },
                    other => other,
                })?;
                Ok::<(String, Vec<u8>), BundleError>((path, data))
            });
        }

        let mut contents: HashMap<String, Vec<u8>> = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (path, data) = joined.map_err(|err| BundleError::ProcessingError {
                message: format!("Read task panicked: {}", err),
            })??;
            contents.insert(path, data);
        }

        for file in set.vectors.iter_mut().chain(set.bitmaps.iter_mut()) {
            if let Some(data) = contents.get(&file.filename) {
                file.data = Some(data.clone());
            }
        }
        Ok(())
    }

    fn in_group<'a>(&self, files: &'a [IconFile], group: Option<&str>) -> Vec<&'a IconFile> {
        files
            .iter()
            .filter(|file| match (group, self.plan.groups.as_ref()) {
                (Some(group), Some(rules)) => rules.matches(group, &file.name),
                _ => true,
            })
            .collect()
    }

    fn rules_for(
        &self,
        ty: OutputType,
        group: Option<&str>,
        set: &IconSet,
    ) -> Result<Vec<String>> {
        match ty {
            OutputType::Vector => self
                .in_group(&set.vectors, group)
                .into_iter()
                .map(|file| self.encoder.vector_rule(file))
                .collect(),
            OutputType::Bitmap => self
                .in_group(&set.bitmaps, group)
                .into_iter()
                .map(|file| self.encoder.base64_rule(file))
                .collect(),
            OutputType::IeLink => Ok(self
                .in_group(&set.bitmaps, group)
                .into_iter()
                .map(|file| self.encoder.link_rule(file, false))
                .collect()),
            OutputType::Ie6Filter => Ok(self
                .in_group(&set.bitmaps, group)
                .into_iter()
                .map(|file| self.encoder.filter_rule(file))
                .collect()),
            OutputType::Combo => {
                let mut rules = self
                    .in_group(&set.vectors, group)
                    .into_iter()
                    .map(|file| self.encoder.vector_rule(file))
                    .collect::<Result<Vec<_>>>()?;
                // Link fallbacks come after the vector rules and carry the
                // fallback selector prefix.
                rules.extend(
                    self.in_group(&set.bitmaps, group)
                        .into_iter()
                        .map(|file| self.encoder.link_rule(file, true)),
                );
                Ok(rules)
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage + Clone + 'static> Pipeline for IconPipeline<S> {
    async fn collect(&self) -> Result<Vec<IconPair>> {
        let files = self.source.list_files().await?;
        tracing::debug!("Scanned {} files in source tree", files.len());

        let mut pairs: BTreeMap<String, IconPair> = BTreeMap::new();
        for path in files.iter().filter(|path| self.qualifies(path)) {
            let file = IconFile::from_relative_path(path);
            let entry = pairs.entry(file.base().to_string()).or_insert_with(|| IconPair {
                name: file.base().to_string(),
                ..Default::default()
            });
            // A later duplicate in the same slot replaces the earlier one.
            if file.is_vector() {
                entry.vector = Some(file);
            } else {
                entry.bitmap = Some(file);
            }
        }

        let targets = self.plan.all_targets().join(", ");
        for pair in pairs.values() {
            if pair.bitmap.is_none() {
                tracing::warn!(
                    "There is no degradation image file for \"{}\", targets: {}",
                    pair.name,
                    targets
                );
            }
            if pair.vector.is_none() {
                tracing::warn!(
                    "There is no vector image file for \"{}\", targets: {}",
                    pair.name,
                    targets
                );
            }
        }

        Ok(pairs.into_values().collect())
    }

    async fn render(&self, pairs: Vec<IconPair>) -> Result<Vec<CssArtifact>> {
        let mut set = IconSet::from_pairs(pairs);
        if self.plan.needs_file_data() {
            self.load_contents(&mut set).await?;
        }

        let mut artifacts = Vec::new();
        for ty in &self.plan.types {
            for group in self.plan.group_names() {
                let rules = self.rules_for(*ty, group.as_deref(), &set)?;
                let target = self.plan.target_for(*ty, group.as_deref());
                tracing::debug!("Rendered {} rules for target {}", rules.len(), target);
                artifacts.push(CssArtifact {
                    target,
                    rules: rules.len(),
                    css: rules.join("\n"),
                });
            }
        }
        Ok(artifacts)
    }

    async fn write(&self, artifacts: Vec<CssArtifact>) -> Result<Vec<String>> {
        let mut tasks = JoinSet::new();
        for artifact in artifacts {
            let storage = self.output.clone();
            tasks.spawn(async move {
                storage
                    .write_file(&artifact.target, artifact.css.as_bytes())
                    .await
                    .map_err(|err| match err {
                        BundleError::IoError(source) => BundleError::FileWriteError {
                            target: artifact.target.clone(),
                            source,
                        },
                        other => other,
                    })?;
                Ok::<String, BundleError>(artifact.target)
            });
        }

        let mut targets = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let target = joined.map_err(|err| BundleError::ProcessingError {
                message: format!("Write task panicked: {}", err),
            })??;
            targets.push(target);
        }
        targets.sort();
        Ok(targets)
    }
}
