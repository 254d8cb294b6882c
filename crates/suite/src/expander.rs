//! Matrix expansion: one independent [`TestInstance`] per (template, name, image).

use patchmatrix_core::metrics as m;
use patchmatrix_core::types::{Template, TestInstance};
use tracing::debug;

use crate::catalog::CatalogEntry;
use crate::template::TemplateId;

/// A template paired with the image set it is expanded against.
#[derive(Debug, Clone, Copy)]
pub struct Binding<'a> {
    pub template_id: TemplateId,
    pub template: &'a Template,
    pub images: &'a CatalogEntry,
}

/// Instances of one template, one per `(name, image)` in `images`.
///
/// Each instance gets its own copy of the template metadata.
pub fn expand_template<'a>(
    template: &'a Template,
    images: &'a CatalogEntry,
) -> impl Iterator<Item = TestInstance> + 'a {
    images
        .iter()
        .map(move |(name, image)| template.instantiate(name, image))
}

/// Expands every binding, in binding order then name order.
///
/// Callers must not rely on the order of the result.
pub fn expand(bindings: &[Binding<'_>]) -> Vec<TestInstance> {
    let capacity = bindings.iter().map(|b| b.images.len()).sum();
    let mut instances = Vec::with_capacity(capacity);

    for binding in bindings {
        let before = instances.len();
        instances.extend(expand_template(binding.template, binding.images));
        let produced = instances.len() - before;

        debug!(
            template = %binding.template_id,
            instances = produced,
            "expanded template"
        );
        metrics::counter!(
            m::INSTANCES_GENERATED_TOTAL,
            m::LABEL_TEMPLATE => binding.template_id.as_str()
        )
        .increment(produced as u64);
    }

    instances
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use patchmatrix_core::types::MetadataItem;

    use super::*;

    fn template() -> Template {
        Template::new(
            vec![
                MetadataItem::new("startup-script", "record boot; install agent; hook"),
                MetadataItem::new("enable-osconfig", "true"),
            ],
            Duration::from_secs(10 * 60),
            "e2-medium",
        )
    }

    #[test]
    fn single_entry_example() {
        let template = template();
        let images: CatalogEntry = [("apt-head-debian11", "debian-11")].into_iter().collect();

        let instances = expand(&[Binding {
            template_id: TemplateId::Apt,
            template: &template,
            images: &images,
        }]);

        assert_eq!(instances.len(), 1);
        let instance = &instances[0];
        assert_eq!(instance.name, "apt-head-debian11");
        assert_eq!(instance.image, "debian-11");
        assert_eq!(instance.assert_timeout, Duration::from_secs(600));
        assert_eq!(instance.machine_type, "e2-medium");
        assert_eq!(instance.metadata, template.metadata());
    }

    #[test]
    fn one_instance_per_image() {
        let template = template();
        let images: CatalogEntry = [("a", "img-a"), ("b", "img-b"), ("c", "img-c")]
            .into_iter()
            .collect();

        let instances: Vec<_> = expand_template(&template, &images).collect();
        assert_eq!(instances.len(), images.len());
        for instance in &instances {
            assert_eq!(images.get(&instance.name), Some(instance.image.as_str()));
        }
    }

    #[test]
    fn empty_entry_yields_nothing() {
        let template = template();
        let instances = expand(&[Binding {
            template_id: TemplateId::Suse,
            template: &template,
            images: &CatalogEntry::new(),
        }]);
        assert!(instances.is_empty());
    }

    #[test]
    fn mutating_one_instance_leaves_siblings_and_template_alone() {
        let template = template();
        let images: CatalogEntry = [("a", "img-a"), ("b", "img-b")].into_iter().collect();
        let mut instances = expand(&[Binding {
            template_id: TemplateId::Apt,
            template: &template,
            images: &images,
        }]);

        instances[0].metadata[0].value = "tampered".to_owned();
        instances[0].metadata.push(MetadataItem::new("extra", "1"));

        assert_eq!(instances[1].metadata, template.metadata());
        assert_eq!(template.metadata().len(), 2);
        assert_eq!(
            template.metadata_value("startup-script"),
            Some("record boot; install agent; hook")
        );
    }

    #[test]
    fn bindings_expand_in_order() {
        let first = template();
        let second = Template::new(Vec::new(), Duration::from_secs(3600), "e2-standard-4");
        let first_images: CatalogEntry = [("b", "1"), ("a", "2")].into_iter().collect();
        let second_images: CatalogEntry = [("c", "3")].into_iter().collect();

        let instances = expand(&[
            Binding {
                template_id: TemplateId::Apt,
                template: &first,
                images: &first_images,
            },
            Binding {
                template_id: TemplateId::Windows,
                template: &second,
                images: &second_images,
            },
        ]);

        let names: Vec<_> = instances.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(instances[2].machine_type, "e2-standard-4");
    }
}
